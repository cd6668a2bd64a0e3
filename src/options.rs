// src/options.rs
use serde::{Deserialize, Serialize};
use web_sys::Element;

/// Per-host JSON configuration, e.g.
/// `<light-box data-light-box-options='{"transitionMs": 200}'>`.
pub const OPTIONS_ATTR: &str = "data-light-box-options";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightBoxOptions {
    /// Duration of the thumbnail <-> viewport geometry transition.
    pub transition_ms: u32,
    /// How long navigation waits for the outgoing image to fade.
    pub fade_ms: u32,
    pub opacity_fade_ms: u32,
    pub curve: String,
}

impl Default for LightBoxOptions {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            fade_ms: 120,
            opacity_fade_ms: 140,
            curve: String::from("cubic-bezier(0.22, 1, 0.36, 1)"),
        }
    }
}

impl LightBoxOptions {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid light-box options: {}", e))
    }

    /// Reads the options attribute of `host`. A missing attribute yields the
    /// defaults; malformed JSON is logged and also yields the defaults.
    pub fn from_element(host: &Element) -> Self {
        let Some(raw) = host.get_attribute(OPTIONS_ATTR) else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(options) => options,
            Err(e) => {
                log::warn!(target: "lightbox", "{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// CSS `transition` value for the stage image.
    pub fn image_transition(&self) -> String {
        let geometry = ["top", "left", "width", "height"]
            .iter()
            .map(|property| format!("{} {}ms {}", property, self.transition_ms, self.curve))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}, opacity {}ms ease", geometry, self.opacity_fade_ms)
    }

    pub fn backdrop_transition(&self) -> String {
        format!("opacity {}ms {}", self.transition_ms, self.curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LightBoxOptions::default();
        assert_eq!(options.transition_ms, 300);
        assert_eq!(options.fade_ms, 120);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = LightBoxOptions::from_json(r#"{"transitionMs": 180}"#).unwrap();
        assert_eq!(options.transition_ms, 180);
        assert_eq!(options.fade_ms, 120);
        assert_eq!(options.curve, LightBoxOptions::default().curve);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(LightBoxOptions::from_json("{transitionMs: }").is_err());
        assert!(LightBoxOptions::from_json(r#"{"fadeMs": -4}"#).is_err());
    }

    #[test]
    fn test_transitions() {
        let options = LightBoxOptions {
            transition_ms: 10,
            fade_ms: 0,
            opacity_fade_ms: 5,
            curve: "linear".to_string(),
        };
        assert_eq!(
            options.image_transition(),
            "top 10ms linear, left 10ms linear, width 10ms linear, height 10ms linear, opacity 5ms ease"
        );
        assert_eq!(options.backdrop_transition(), "opacity 10ms linear");
    }
}
