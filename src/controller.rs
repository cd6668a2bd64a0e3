// src/controller.rs
//! The open / close / navigate state machine.
//!
//! Every operation that suspends advances the shared [`Generation`] first and
//! re-checks its ticket after each await. A stale ticket means a newer
//! operation owns the DOM, so the continuation returns without touching it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::timers::future::TimeoutFuture;
use gloo_events::EventListener;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlDivElement, HtmlElement, HtmlImageElement};

use crate::geometry::{
    apply_rect, bounding_rect, first_positive, safe_rect, target_rect, Rect, Viewport,
};
use crate::input::{self, OverlayCommand};
use crate::motion::MotionQuery;
use crate::options::LightBoxOptions;
use crate::overlay::{Overlay, OverlayAction};
use crate::registry::{
    index_of_thumb, normalize_index, scan_items, GalleryItem, RegistryObserver,
};
use crate::scroll_lock::{BodyScrollLock, OwnerId, ScrollLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Closed,
    Opening,
    Open,
    Navigating,
    Closing,
}

impl TransitionState {
    /// Everything but `Closed` has an active item and accepts navigation.
    pub fn is_open(self) -> bool {
        self != TransitionState::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic counter invalidating in-flight continuations.
#[derive(Debug, Default)]
pub struct Generation(Cell<u64>);

impl Generation {
    pub fn advance(&self) -> Ticket {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.get() == ticket.0
    }
}

struct Inner {
    host: HtmlElement,
    options: LightBoxOptions,
    motion: RefCell<MotionQuery>,
    scroll_lock: Rc<dyn ScrollLock>,
    owner: OwnerId,
    generation: Generation,
    state: Cell<TransitionState>,
    active: Cell<Option<usize>>,
    items: RefCell<Vec<GalleryItem>>,
    overlay: RefCell<Option<Overlay>>,
    gallery_listeners: RefCell<Vec<EventListener>>,
    open_listeners: RefCell<Vec<EventListener>>,
    observer: RefCell<Option<RegistryObserver>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(overlay) = self.overlay.get_mut().take() {
            overlay.teardown();
        }
        self.scroll_lock.unlock(self.owner);
    }
}

/// Overlay parts an animation step writes to, cloned out of the `RefCell` so
/// no borrow is held across an await.
struct Stage {
    root: HtmlDivElement,
    backdrop: HtmlDivElement,
    image: HtmlImageElement,
}

/// A lightbox attached to one gallery host element.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct LightBox {
    inner: Rc<Inner>,
}

impl PartialEq for LightBox {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl LightBox {
    /// Attaches to `host`: scans its images, listens for trigger activation
    /// and watches the subtree for additions and removals.
    pub fn connect(host: HtmlElement, options: LightBoxOptions) -> Self {
        Self::connect_with(host, options, Rc::new(BodyScrollLock))
    }

    pub fn connect_with(
        host: HtmlElement,
        options: LightBoxOptions,
        scroll_lock: Rc<dyn ScrollLock>,
    ) -> Self {
        let lightbox = Self {
            inner: Rc::new(Inner {
                host,
                options,
                motion: RefCell::new(MotionQuery::from_window()),
                scroll_lock,
                owner: OwnerId::next(),
                generation: Generation::default(),
                state: Cell::new(TransitionState::Closed),
                active: Cell::new(None),
                items: RefCell::new(Vec::new()),
                overlay: RefCell::new(None),
                gallery_listeners: RefCell::new(Vec::new()),
                open_listeners: RefCell::new(Vec::new()),
                observer: RefCell::new(None),
            }),
        };

        lightbox.refresh_items();

        let weak = Rc::downgrade(&lightbox.inner);
        let listeners = input::gallery_listeners(&lightbox.inner.host, move |thumb| {
            let Some(lightbox) = LightBox::upgrade(&weak) else {
                return false;
            };
            let Some(index) = index_of_thumb(&lightbox.inner.items.borrow(), &thumb) else {
                return false;
            };
            spawn_local(async move { lightbox.open(index as i64).await });
            true
        });
        *lightbox.inner.gallery_listeners.borrow_mut() = listeners;

        let weak = Rc::downgrade(&lightbox.inner);
        let observer = RegistryObserver::observe(&lightbox.inner.host, move || {
            if let Some(lightbox) = LightBox::upgrade(&weak) {
                lightbox.refresh_items();
            }
        });
        *lightbox.inner.observer.borrow_mut() = observer;

        log::debug!(
            target: "lightbox",
            "connected with {} images",
            lightbox.inner.items.borrow().len()
        );
        lightbox
    }

    /// Detaches every listener, releases the scroll lock and removes the
    /// overlay. Pending operations of this instance become stale.
    pub fn disconnect(&self) {
        let inner = &self.inner;
        inner.generation.advance();
        inner.gallery_listeners.borrow_mut().clear();
        inner.open_listeners.borrow_mut().clear();
        inner.observer.borrow_mut().take();
        inner.scroll_lock.unlock(inner.owner);

        let overlay = inner.overlay.borrow_mut().take();
        if let Some(overlay) = overlay {
            overlay.teardown();
        }

        inner.active.set(None);
        inner.state.set(TransitionState::Closed);
        log::debug!(target: "lightbox", "disconnected");
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn host(&self) -> &HtmlElement {
        &self.inner.host
    }

    pub fn state(&self) -> TransitionState {
        self.inner.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.inner.active.get()
    }

    pub fn items(&self) -> Vec<GalleryItem> {
        self.inner.items.borrow().clone()
    }

    pub fn overlay_root(&self) -> Option<HtmlElement> {
        self.inner
            .overlay
            .borrow()
            .as_ref()
            .map(|overlay| overlay.root.clone().into())
    }

    /// Whether the overlay is currently shown. False before the first open.
    pub fn overlay_visible(&self) -> bool {
        self.inner
            .overlay
            .borrow()
            .as_ref()
            .map(Overlay::is_visible)
            .unwrap_or(false)
    }

    /// Replaces the reduced-motion source looked up at connect.
    pub fn set_motion_query(&self, motion: MotionQuery) {
        *self.inner.motion.borrow_mut() = motion;
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.inner.motion.borrow().prefers_reduced()
    }

    /// Rebuilds the item list from the host's current images.
    pub fn refresh_items(&self) {
        let items = scan_items(&self.inner.host);
        let total = items.len();
        *self.inner.items.borrow_mut() = items;
        self.with_overlay(|overlay| {
            overlay.update_counter(self.inner.active.get(), total);
            overlay.update_navigation(total);
        });
    }

    fn item(&self, index: usize) -> Option<GalleryItem> {
        self.inner.items.borrow().get(index).cloned()
    }

    fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    fn with_overlay(&self, f: impl FnOnce(&Overlay)) {
        if let Some(overlay) = self.inner.overlay.borrow().as_ref() {
            f(overlay);
        }
    }

    fn stage(&self) -> Option<Stage> {
        self.inner.overlay.borrow().as_ref().map(|overlay| Stage {
            root: overlay.root.clone(),
            backdrop: overlay.backdrop.clone(),
            image: overlay.image.clone(),
        })
    }

    fn ensure_overlay(&self) -> bool {
        if self.inner.overlay.borrow().is_some() {
            return true;
        }

        let weak = Rc::downgrade(&self.inner);
        let on_action: Rc<dyn Fn(OverlayAction)> = Rc::new(move |action: OverlayAction| {
            let Some(lightbox) = LightBox::upgrade(&weak) else {
                return;
            };
            spawn_local(async move {
                match action {
                    OverlayAction::Backdrop
                    | OverlayAction::StageBackground
                    | OverlayAction::Close => lightbox.close().await,
                    OverlayAction::Previous => lightbox.show_previous().await,
                    OverlayAction::Next => lightbox.show_next().await,
                }
            });
        });

        match Overlay::build(&gloo_utils::document(), on_action) {
            Ok(overlay) => {
                overlay.update_navigation(self.len());
                *self.inner.overlay.borrow_mut() = Some(overlay);
                true
            }
            Err(e) => {
                log::warn!(target: "lightbox", "overlay construction failed: {}", e);
                false
            }
        }
    }

    /// Makes the overlay visible and takes the page-level resources an open
    /// lightbox holds. Idempotent.
    fn reveal(&self, index: usize) {
        let total = self.len();
        self.with_overlay(|overlay| {
            overlay.show();
            overlay.update_counter(Some(index), total);
            overlay.update_navigation(total);
        });
        self.inner.scroll_lock.lock(self.inner.owner);
        self.attach_open_listeners();
    }

    fn attach_open_listeners(&self) {
        let on_command = {
            let weak = Rc::downgrade(&self.inner);
            move |command: OverlayCommand| {
                let Some(lightbox) = LightBox::upgrade(&weak) else {
                    return false;
                };
                if !lightbox.is_open() {
                    return false;
                }
                spawn_local(async move {
                    match command {
                        OverlayCommand::Close => lightbox.close().await,
                        OverlayCommand::Previous => lightbox.show_previous().await,
                        OverlayCommand::Next => lightbox.show_next().await,
                    }
                });
                true
            }
        };
        let on_resize = {
            let weak = Rc::downgrade(&self.inner);
            move || {
                if let Some(lightbox) = LightBox::upgrade(&weak) {
                    lightbox.relayout();
                }
            }
        };

        let listeners = input::open_listeners(on_command, on_resize);
        *self.inner.open_listeners.borrow_mut() = listeners;
    }

    /// Target rect for `item` given what is known about its size so far.
    fn target_for(
        &self,
        image: &HtmlImageElement,
        item: &GalleryItem,
        fallback: (f64, f64),
    ) -> Rect {
        let width = first_positive(&[
            image.natural_width() as f64,
            item.thumb.natural_width() as f64,
            fallback.0,
        ]);
        let height = first_positive(&[
            image.natural_height() as f64,
            item.thumb.natural_height() as f64,
            fallback.1,
        ]);
        target_rect(width, height, Viewport::current())
    }

    /// Re-fits the current image to the viewport, without animation.
    fn relayout(&self) {
        if !self.is_open() {
            return;
        }
        let Some(item) = self.active_index().and_then(|index| self.item(index)) else {
            return;
        };
        let Some(stage) = self.stage() else {
            return;
        };
        let fallback = (item.thumb.width() as f64, item.thumb.height() as f64);
        let rect = self.target_for(&stage.image, &item, fallback);
        apply_rect(&stage.image, rect);
    }

    /// Opens the item at `index`, wrapping any integer onto the gallery.
    pub async fn open(&self, index: i64) {
        let inner = &self.inner;
        let total = self.len();
        let Some(index) = normalize_index(index, total) else {
            return;
        };
        if !self.ensure_overlay() {
            return;
        }
        let Some(stage) = self.stage() else {
            return;
        };

        let ticket = inner.generation.advance();
        let Some(item) = self.item(index) else {
            return;
        };
        let from = safe_rect(bounding_rect(&item.thumb), Viewport::current());

        inner.active.set(Some(index));
        inner.state.set(TransitionState::Opening);
        log::debug!(target: "lightbox", "opening image {} of {}", index + 1, total);

        stage.image.set_alt(&item.alt);
        stage.image.set_src(&item.src);
        wait_for_image(&stage.image).await;
        if !inner.generation.is_current(ticket) {
            log::debug!(target: "lightbox", "open of image {} superseded", index + 1);
            return;
        }

        let to = self.target_for(&stage.image, &item, (from.width, from.height));

        // Start geometry goes in before the overlay shows so there is no jump
        // from wherever the image was left by the last close.
        clear_style(&stage.image, "transition");
        set_style(&stage.image, "opacity", "0");
        apply_rect(&stage.image, from);

        self.reveal(index);

        if self.prefers_reduced_motion() {
            self.with_overlay(|overlay| overlay.set_open(true));
            apply_rect(&stage.image, to);
            set_style(&stage.image, "opacity", "1");
            inner.state.set(TransitionState::Open);
            return;
        }

        set_style(&stage.image, "transition", &inner.options.image_transition());
        set_style(&stage.backdrop, "transition", &inner.options.backdrop_transition());

        // Layout flush: without it the start and end rects coalesce and the
        // browser never animates.
        let _ = stage.root.offset_width();

        set_style(&stage.image, "opacity", "1");
        self.with_overlay(|overlay| overlay.set_open(true));
        apply_rect(&stage.image, to);

        TimeoutFuture::new(inner.options.transition_ms).await;
        if !inner.generation.is_current(ticket) {
            return;
        }
        clear_style(&stage.image, "transition");
        clear_style(&stage.backdrop, "transition");
        inner.state.set(TransitionState::Open);
    }

    /// Flies the image back to its thumbnail (or fades it out when the
    /// thumbnail is gone) and hides the overlay.
    pub async fn close(&self) {
        let inner = &self.inner;
        if !self.is_open() {
            return;
        }
        let Some(active) = self.active_index() else {
            return;
        };
        let Some(stage) = self.stage() else {
            return;
        };

        let ticket = inner.generation.advance();
        inner.state.set(TransitionState::Closing);
        log::debug!(target: "lightbox", "closing image {}", active + 1);
        self.with_overlay(|overlay| overlay.set_open(false));

        if !self.prefers_reduced_motion() {
            set_style(&stage.image, "transition", &inner.options.image_transition());
            let thumb = self
                .item(active)
                .map(|item| item.thumb)
                .filter(|thumb| thumb.is_connected());
            match thumb {
                Some(thumb) => {
                    let rect = safe_rect(bounding_rect(&thumb), Viewport::current());
                    apply_rect(&stage.image, rect);
                }
                None => set_style(&stage.image, "opacity", "0"),
            }

            TimeoutFuture::new(inner.options.transition_ms).await;
            if !inner.generation.is_current(ticket) {
                log::debug!(target: "lightbox", "close superseded");
                return;
            }
        }

        self.with_overlay(|overlay| {
            overlay.hide();
            overlay.update_counter(None, 0);
        });
        clear_style(&stage.image, "transition");
        clear_style(&stage.image, "opacity");
        let _ = stage.image.remove_attribute("src");

        inner.scroll_lock.unlock(inner.owner);
        inner.open_listeners.borrow_mut().clear();

        inner.active.set(None);
        inner.state.set(TransitionState::Closed);
    }

    pub async fn show_next(&self) {
        if !self.is_open() {
            return;
        }
        let Some(active) = self.active_index() else {
            return;
        };
        self.show_index(active as i64 + 1).await;
    }

    pub async fn show_previous(&self) {
        if !self.is_open() {
            return;
        }
        let Some(active) = self.active_index() else {
            return;
        };
        self.show_index(active as i64 - 1).await;
    }

    /// Fades out, swaps source and geometry, fades back in. There is no
    /// cross-image morph.
    pub async fn show_index(&self, index: i64) {
        let inner = &self.inner;
        if !self.is_open() {
            return;
        }
        let Some(stage) = self.stage() else {
            return;
        };
        let total = self.len();
        let Some(target) = normalize_index(index, total) else {
            return;
        };
        if Some(target) == self.active_index() {
            return;
        }

        let ticket = inner.generation.advance();
        let Some(item) = self.item(target) else {
            return;
        };
        inner.state.set(TransitionState::Navigating);
        log::debug!(target: "lightbox", "navigating to image {} of {}", target + 1, total);

        set_style(&stage.image, "opacity", "0");
        if !self.prefers_reduced_motion() {
            TimeoutFuture::new(inner.options.fade_ms).await;
        }
        if !inner.generation.is_current(ticket) {
            log::debug!(target: "lightbox", "navigation to image {} superseded", target + 1);
            return;
        }

        inner.active.set(Some(target));
        stage.image.set_src(&item.src);
        stage.image.set_alt(&item.alt);

        wait_for_image(&stage.image).await;
        if !inner.generation.is_current(ticket) {
            log::debug!(target: "lightbox", "navigation to image {} superseded", target + 1);
            return;
        }

        let fallback = (item.thumb.width() as f64, item.thumb.height() as f64);
        let rect = self.target_for(&stage.image, &item, fallback);
        apply_rect(&stage.image, rect);

        // Also covers a navigation that superseded an open before its reveal,
        // or a close before it hid the overlay.
        self.reveal(target);
        self.with_overlay(|overlay| overlay.set_open(true));

        set_style(&stage.image, "opacity", "1");
        inner.state.set(TransitionState::Open);
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

fn clear_style(element: &HtmlElement, property: &str) {
    let _ = element.style().remove_property(property);
}

/// Resolves once the image has decoded, or once it failed to: a broken image
/// still gets laid out rather than stalling the transition.
async fn wait_for_image(image: &HtmlImageElement) {
    if image.complete() && image.natural_width() > 0 {
        return;
    }

    let mut listeners = Vec::with_capacity(2);
    let ready = js_sys::Promise::new(&mut |resolve, _reject| {
        for event in ["load", "error"] {
            let resolve = resolve.clone();
            listeners.push(EventListener::once(image, event, move |_| {
                let _ = resolve.call0(&JsValue::NULL);
            }));
        }
    });
    let _ = JsFuture::from(ready).await;
    drop(listeners);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_invalidates_older_tickets() {
        let generation = Generation::default();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.advance();
        let third = generation.advance();
        assert!(!generation.is_current(first));
        assert!(!generation.is_current(second));
        assert!(generation.is_current(third));
    }

    #[test]
    fn test_tickets_are_distinct() {
        let generation = Generation::default();
        let tickets: Vec<Ticket> = (0..5).map(|_| generation.advance()).collect();
        for (i, a) in tickets.iter().enumerate() {
            for b in &tickets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_state_openness() {
        assert!(!TransitionState::Closed.is_open());
        for state in [
            TransitionState::Opening,
            TransitionState::Open,
            TransitionState::Navigating,
            TransitionState::Closing,
        ] {
            assert!(state.is_open(), "{:?} should count as open", state);
        }
    }
}
