// src/element.rs
//! `<light-box>` elements in static markup.
//!
//! Rust can't subclass `HTMLElement` without JS glue, so the tag is upgraded
//! from here instead: every `light-box` element gets a [`LightBox`] attached,
//! and a body-level observer plays the part of the connected/disconnected
//! callbacks as elements come and go.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MutationObserver, MutationObserverInit};

use crate::controller::LightBox;
use crate::options::LightBoxOptions;

pub const LIGHT_BOX_TAG: &str = "light-box";
/// Set on hosts that already have a controller attached.
pub const READY_ATTR: &str = "data-light-box-ready";

struct Upgrades {
    instances: Vec<LightBox>,
    watcher: Option<(MutationObserver, Closure<dyn FnMut()>)>,
}

thread_local! {
    static UPGRADES: RefCell<Upgrades> = const {
        RefCell::new(Upgrades {
            instances: Vec::new(),
            watcher: None,
        })
    };
}

/// Upgrades every `light-box` element on the page and keeps doing so as
/// elements are inserted or removed. Calling it again is harmless.
#[wasm_bindgen(js_name = defineLightBox)]
pub fn define_light_box() {
    let document = gloo_utils::document();
    sync(&document);

    let installed = UPGRADES.with(|upgrades| upgrades.borrow().watcher.is_some());
    if installed {
        return;
    }
    let Some(body) = document.body() else {
        log::warn!(target: "lightbox", "no <body> to watch for light-box elements");
        return;
    };

    let callback = Closure::<dyn FnMut()>::new(move || sync(&gloo_utils::document()));
    let Ok(observer) = MutationObserver::new(callback.as_ref().unchecked_ref()) else {
        return;
    };
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if observer.observe_with_options(&body, &init).is_err() {
        return;
    }

    UPGRADES.with(|upgrades| upgrades.borrow_mut().watcher = Some((observer, callback)));
}

/// Attaches a controller to each `light-box` element not yet upgraded and
/// returns how many were attached.
pub fn upgrade_all(document: &Document) -> usize {
    let Ok(nodes) = document.query_selector_all(LIGHT_BOX_TAG) else {
        return 0;
    };

    let mut attached = 0;
    for i in 0..nodes.length() {
        let Some(host) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        if host.has_attribute(READY_ATTR) {
            continue;
        }
        let options = LightBoxOptions::from_element(&host);
        let _ = host.set_attribute(READY_ATTR, "");
        let lightbox = LightBox::connect(host, options);
        UPGRADES.with(|upgrades| upgrades.borrow_mut().instances.push(lightbox));
        attached += 1;
    }
    attached
}

/// Disconnects instances whose host left the document and returns how many
/// were dropped.
pub fn release_detached() -> usize {
    let detached: Vec<LightBox> = UPGRADES.with(|upgrades| {
        let mut upgrades = upgrades.borrow_mut();
        let (gone, kept) = upgrades
            .instances
            .drain(..)
            .partition(|lightbox: &LightBox| !lightbox.host().is_connected());
        upgrades.instances = kept;
        gone
    });

    for lightbox in &detached {
        let _ = lightbox.host().remove_attribute(READY_ATTR);
        lightbox.disconnect();
    }
    detached.len()
}

/// Upgraded instance for `host`, if any.
pub fn instance_for(host: &HtmlElement) -> Option<LightBox> {
    UPGRADES.with(|upgrades| {
        upgrades
            .borrow()
            .instances
            .iter()
            .find(|lightbox| lightbox.host() == host)
            .cloned()
    })
}

fn sync(document: &Document) {
    let released = release_detached();
    let attached = upgrade_all(document);
    if released > 0 || attached > 0 {
        log::debug!(
            target: "lightbox",
            "light-box elements: {} attached, {} released",
            attached,
            released
        );
    }
}
