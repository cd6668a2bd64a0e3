// src/overlay.rs
use std::fmt;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlDivElement, HtmlImageElement,
    HtmlParagraphElement,
};

pub const OVERLAY_CLASS: &str = "light-box-overlay";
pub const VISIBLE_CLASS: &str = "is-visible";
pub const OPEN_CLASS: &str = "is-open";

const TEMPLATE: &str = r#"
    <div class="light-box-backdrop" data-light-box-backdrop></div>
    <div class="light-box-stage" data-light-box-stage>
        <button class="light-box-control light-box-prev" type="button" data-light-box-prev>
            <span aria-hidden="true">&lsaquo;</span>
            <span class="visually-hidden">Previous image</span>
        </button>
        <img class="light-box-image" alt="" data-light-box-image />
        <button class="light-box-control light-box-next" type="button" data-light-box-next>
            <span aria-hidden="true">&rsaquo;</span>
            <span class="visually-hidden">Next image</span>
        </button>
        <button class="light-box-close" type="button" data-light-box-close>
            <span aria-hidden="true">&times;</span>
            <span class="visually-hidden">Close lightbox</span>
        </button>
        <p class="light-box-counter" aria-live="polite" data-light-box-counter></p>
    </div>
"#;

/// What a click inside the overlay asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Backdrop,
    StageBackground,
    Close,
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    NoDocument,
    Dom(String),
    Missing(&'static str),
    WrongElement(&'static str),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::NoDocument => write!(f, "no document body to attach the overlay to"),
            OverlayError::Dom(message) => write!(f, "dom error: {}", message),
            OverlayError::Missing(part) => write!(f, "overlay template has no {}", part),
            OverlayError::WrongElement(part) => {
                write!(f, "overlay {} has an unexpected element type", part)
            }
        }
    }
}

pub fn counter_text(active: Option<usize>, total: usize) -> String {
    match active {
        Some(index) if total > 0 => format!("{} / {}", index + 1, total),
        _ => String::new(),
    }
}

/// The component-owned full screen subtree, attached to `<body>`.
pub struct Overlay {
    pub root: HtmlDivElement,
    pub backdrop: HtmlDivElement,
    pub stage: HtmlDivElement,
    pub image: HtmlImageElement,
    pub prev_button: HtmlButtonElement,
    pub next_button: HtmlButtonElement,
    pub close_button: HtmlButtonElement,
    pub counter: HtmlParagraphElement,
    listeners: Vec<EventListener>,
}

impl Overlay {
    /// Builds the subtree, validates every part once, wires the click
    /// listeners and appends the overlay to `<body>`.
    pub fn build(
        document: &Document,
        on_action: Rc<dyn Fn(OverlayAction)>,
    ) -> Result<Self, OverlayError> {
        let body = document.body().ok_or(OverlayError::NoDocument)?;

        let root: HtmlDivElement = document
            .create_element("div")
            .map_err(|e| OverlayError::Dom(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| OverlayError::WrongElement("root"))?;
        root.set_class_name(OVERLAY_CLASS);
        let _ = root.set_attribute("aria-hidden", "true");
        root.set_inner_html(TEMPLATE);

        let backdrop = part::<HtmlDivElement>(&root, "[data-light-box-backdrop]", "backdrop")?;
        let stage = part::<HtmlDivElement>(&root, "[data-light-box-stage]", "stage")?;
        let image = part::<HtmlImageElement>(&root, "[data-light-box-image]", "image")?;
        let prev_button = part::<HtmlButtonElement>(&root, "[data-light-box-prev]", "prev button")?;
        let next_button = part::<HtmlButtonElement>(&root, "[data-light-box-next]", "next button")?;
        let close_button =
            part::<HtmlButtonElement>(&root, "[data-light-box-close]", "close button")?;
        let counter = part::<HtmlParagraphElement>(&root, "[data-light-box-counter]", "counter")?;

        let mut listeners = Vec::with_capacity(5);

        listeners.push({
            let on_action = on_action.clone();
            EventListener::new(&backdrop, "click", move |_| {
                log::debug!(target: "lightbox", "backdrop click");
                on_action(OverlayAction::Backdrop);
            })
        });

        listeners.push({
            let on_action = on_action.clone();
            let stage_node = stage.clone();
            EventListener::new(&stage, "click", move |event| {
                let stage_target: &EventTarget = stage_node.as_ref();
                let on_background = event
                    .target()
                    .map(|target| target == *stage_target)
                    .unwrap_or(false);
                if !on_background {
                    return;
                }
                log::debug!(target: "lightbox", "stage click");
                on_action(OverlayAction::StageBackground);
            })
        });

        for (button, action) in [
            (&close_button, OverlayAction::Close),
            (&prev_button, OverlayAction::Previous),
            (&next_button, OverlayAction::Next),
        ] {
            let on_action = on_action.clone();
            listeners.push(EventListener::new_with_options(
                button,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    event.prevent_default();
                    on_action(action);
                },
            ));
        }

        body.append_child(&root)
            .map_err(|e| OverlayError::Dom(format!("{:?}", e)))?;

        Ok(Self {
            root,
            backdrop,
            stage,
            image,
            prev_button,
            next_button,
            close_button,
            counter,
            listeners,
        })
    }

    /// Removes every listener and detaches the subtree.
    pub fn teardown(self) {
        drop(self.listeners);
        self.root.remove();
    }

    pub fn update_counter(&self, active: Option<usize>, total: usize) {
        let text = counter_text(active, total);
        self.counter.set_text_content(Some(text.as_str()));
    }

    pub fn update_navigation(&self, total: usize) {
        let has_multiple = total > 1;
        for button in [&self.prev_button, &self.next_button] {
            button.set_hidden(!has_multiple);
            button.set_disabled(!has_multiple);
        }
    }

    pub fn show(&self) {
        let _ = self.root.class_list().add_1(VISIBLE_CLASS);
        let _ = self.root.set_attribute("aria-hidden", "false");
    }

    pub fn hide(&self) {
        let _ = self.root.class_list().remove_2(OPEN_CLASS, VISIBLE_CLASS);
        let _ = self.root.set_attribute("aria-hidden", "true");
    }

    pub fn set_open(&self, open: bool) {
        let classes = self.root.class_list();
        let _ = if open {
            classes.add_1(OPEN_CLASS)
        } else {
            classes.remove_1(OPEN_CLASS)
        };
    }

    pub fn is_visible(&self) -> bool {
        self.root.class_list().contains(VISIBLE_CLASS)
    }
}

/// Typed lookup of one overlay part. A missing node and a node of the wrong
/// element type are both construction failures.
fn part<T: JsCast>(
    root: &HtmlDivElement,
    selector: &str,
    name: &'static str,
) -> Result<T, OverlayError> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .ok_or(OverlayError::Missing(name))?
        .dyn_into::<T>()
        .map_err(|_| OverlayError::WrongElement(name))
}
