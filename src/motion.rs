// src/motion.rs
use web_sys::MediaQueryList;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The host's reduced-motion preference. The media query is looked up once
/// per connect and read each time an animation is about to start.
#[derive(Debug, Clone, Default)]
pub struct MotionQuery {
    list: Option<MediaQueryList>,
    forced: Option<bool>,
}

impl MotionQuery {
    pub fn from_window() -> Self {
        let list = web_sys::window()
            .and_then(|window| window.match_media(REDUCED_MOTION_QUERY).ok().flatten());
        Self { list, forced: None }
    }

    /// A fixed preference, ignoring the media query.
    pub fn fixed(reduced: bool) -> Self {
        Self {
            list: None,
            forced: Some(reduced),
        }
    }

    pub fn prefers_reduced(&self) -> bool {
        if let Some(reduced) = self.forced {
            return reduced;
        }
        self.list.as_ref().map(|list| list.matches()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_preference() {
        assert!(MotionQuery::fixed(true).prefers_reduced());
        assert!(!MotionQuery::fixed(false).prefers_reduced());
        assert!(!MotionQuery::default().prefers_reduced());
    }
}
