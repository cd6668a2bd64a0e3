// src/input.rs
//! Maps pointer and keyboard input onto controller operations.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlImageElement, KeyboardEvent};

use crate::registry::THUMB_SELECTOR;

/// Keys that activate a focused trigger image.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

/// Document-level commands while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Close,
    Previous,
    Next,
}

impl OverlayCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Close),
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// The trigger image an event originated from, if any.
pub fn trigger_from_event(event: &Event) -> Option<HtmlImageElement> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(THUMB_SELECTOR)
        .ok()
        .flatten()?
        .dyn_into::<HtmlImageElement>()
        .ok()
}

/// Click and Enter/Space on trigger images inside the host.
///
/// `on_trigger` returns whether it handled the image, in which case the
/// event's default action is prevented.
pub fn gallery_listeners(
    host: &EventTarget,
    on_trigger: impl Fn(HtmlImageElement) -> bool + Clone + 'static,
) -> Vec<EventListener> {
    let on_click = on_trigger.clone();
    let click = EventListener::new_with_options(
        host,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(thumb) = trigger_from_event(event) else {
                return;
            };
            if on_click(thumb) {
                event.prevent_default();
            }
        },
    );

    let keydown = EventListener::new_with_options(
        host,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if !is_activation_key(&key_event.key()) {
                return;
            }
            let Some(thumb) = trigger_from_event(event) else {
                return;
            };
            if on_trigger(thumb) {
                event.prevent_default();
            }
        },
    );

    vec![click, keydown]
}

/// Escape/ArrowLeft/ArrowRight on the document and resize on the window.
/// Attached on open and dropped on close.
pub fn open_listeners(
    on_command: impl Fn(OverlayCommand) -> bool + 'static,
    on_resize: impl Fn() + 'static,
) -> Vec<EventListener> {
    let keydown = EventListener::new_with_options(
        &gloo_utils::document(),
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(command) = OverlayCommand::from_key(&key_event.key()) else {
                return;
            };
            if on_command(command) {
                event.prevent_default();
            }
        },
    );

    let resize = EventListener::new(&gloo_utils::window(), "resize", move |_| on_resize());

    vec![keydown, resize]
}
