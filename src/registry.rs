// src/registry.rs
//! Gallery items: the trigger images found under a host element, plus the
//! observer that keeps that list in step with the host's subtree.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlImageElement, MutationObserver, MutationObserverInit};

/// Marks an image as a gallery trigger.
pub const THUMB_ATTR: &str = "data-light-box-thumb";
/// Optional per-image override pointing at a higher resolution source.
pub const SOURCE_OVERRIDE_ATTR: &str = "data-lightbox-src";
pub const THUMB_SELECTOR: &str = "img[data-light-box-thumb]";
const INTERACTIVE_SELECTOR: &str = "button,a,[role=\"button\"]";

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    /// Owned by the host page; the registry only annotates it.
    pub thumb: HtmlImageElement,
    pub src: String,
    pub alt: String,
}

/// Wraps any integer onto `0..len`, or `None` for an empty gallery.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(index.rem_euclid(len as i64) as usize)
}

pub fn open_label(index: usize, total: usize) -> String {
    format!("Open image {} of {}", index + 1, total)
}

pub fn fallback_alt(index: usize) -> String {
    format!("Image {}", index + 1)
}

/// Picks the first non-empty source: explicit override, then the source the
/// browser is currently rendering, then the raw `src` attribute.
pub fn resolve_source(override_src: Option<&str>, current_src: &str, src: &str) -> String {
    override_src
        .filter(|value| !value.is_empty())
        .or(Some(current_src).filter(|value| !value.is_empty()))
        .unwrap_or(src)
        .to_string()
}

/// Collects every descendant image of `host` in document order, annotates it
/// as a trigger and returns the rebuilt item list.
///
/// Safe to call repeatedly; attributes are rewritten, never accumulated.
pub fn scan_items(host: &Element) -> Vec<GalleryItem> {
    let Ok(nodes) = host.query_selector_all("img") else {
        return Vec::new();
    };

    let thumbs: Vec<HtmlImageElement> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .collect();
    let total = thumbs.len();

    thumbs
        .into_iter()
        .enumerate()
        .map(|(index, thumb)| {
            let _ = thumb.set_attribute(THUMB_ATTR, "true");

            let interactive = is_inside_interactive(&thumb);
            if !interactive && !thumb.has_attribute("tabindex") {
                thumb.set_tab_index(0);
            }
            if !interactive && !thumb.has_attribute("role") {
                let _ = thumb.set_attribute("role", "button");
            }
            let _ = thumb.set_attribute("aria-label", &open_label(index, total));

            let src = resolve_source(
                thumb.get_attribute(SOURCE_OVERRIDE_ATTR).as_deref(),
                &thumb.current_src(),
                &thumb.src(),
            );
            let alt = match thumb.alt() {
                alt if alt.is_empty() => fallback_alt(index),
                alt => alt,
            };

            GalleryItem { thumb, src, alt }
        })
        .collect()
}

/// Whether an ancestor (not the image itself) is already keyboard-operable.
fn is_inside_interactive(thumb: &HtmlImageElement) -> bool {
    thumb
        .parent_element()
        .and_then(|parent| parent.closest(INTERACTIVE_SELECTOR).ok().flatten())
        .is_some()
}

pub fn index_of_thumb(items: &[GalleryItem], thumb: &HtmlImageElement) -> Option<usize> {
    items.iter().position(|item| &item.thumb == thumb)
}

/// Live subscription to additions/removals anywhere under a host.
///
/// Dropping the observer disconnects it.
pub struct RegistryObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut()>,
}

impl RegistryObserver {
    pub fn observe(host: &Element, on_change: impl FnMut() + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut()>::new(on_change);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if observer.observe_with_options(host, &init).is_err() {
            log::warn!(target: "lightbox", "could not observe gallery subtree");
            return None;
        }

        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for RegistryObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_index_wraps() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(3, 3), Some(0));
        assert_eq!(normalize_index(4, 3), Some(1));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-7, 3), Some(2));
        assert_eq!(normalize_index(i64::MIN, 5), Some(i64::MIN.rem_euclid(5) as usize));
        assert_eq!(normalize_index(i64::MAX, 1), Some(0));
    }

    #[test]
    fn test_normalize_index_matches_double_modulo() {
        for n in 1..=7usize {
            for i in -50i64..=50 {
                let n_i = n as i64;
                let expected = ((i % n_i) + n_i) % n_i;
                assert_eq!(normalize_index(i, n), Some(expected as usize));
            }
        }
    }

    #[test]
    fn test_normalize_index_empty() {
        assert_eq!(normalize_index(0, 0), None);
        assert_eq!(normalize_index(-3, 0), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(open_label(0, 2), "Open image 1 of 2");
        assert_eq!(open_label(4, 5), "Open image 5 of 5");
        assert_eq!(fallback_alt(0), "Image 1");
    }

    #[test]
    fn test_resolve_source_priority() {
        assert_eq!(resolve_source(Some("big.jpg"), "cur.jpg", "raw.jpg"), "big.jpg");
        assert_eq!(resolve_source(Some(""), "cur.jpg", "raw.jpg"), "cur.jpg");
        assert_eq!(resolve_source(None, "cur.jpg", "raw.jpg"), "cur.jpg");
        assert_eq!(resolve_source(None, "", "raw.jpg"), "raw.jpg");
        assert_eq!(resolve_source(None, "", ""), "");
    }
}
