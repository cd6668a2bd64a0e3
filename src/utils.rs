// src/utils.rs
use web_sys::window;

/// Path prefix the demo is served under, e.g. `/light-box` on a project
/// page, or empty when served from the domain root.
pub fn base_path() -> String {
    window()
        .and_then(|window| window.location().pathname().ok())
        .map(|pathname| base_from_pathname(&pathname))
        .unwrap_or_default()
}

/// Directory part of a location pathname, without a trailing slash.
pub fn base_from_pathname(pathname: &str) -> String {
    match pathname.rfind('/') {
        Some(end) => pathname[..end].trim_end_matches('/').to_string(),
        None => String::new(),
    }
}

/// Joins `path` onto `base` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    if path.contains("://") || path.starts_with("data:") {
        return path.to_string();
    }
    let clean_path = path.trim_start_matches('/');
    format!("{}/{}", base.trim_end_matches('/'), clean_path)
}

/// Build a resource URL under the current base path.
pub fn resource_url(path: &str) -> String {
    join_url(&base_path(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_pathname() {
        assert_eq!(base_from_pathname("/"), "");
        assert_eq!(base_from_pathname("/index.html"), "");
        assert_eq!(base_from_pathname("/light-box/"), "/light-box");
        assert_eq!(base_from_pathname("/light-box/index.html"), "/light-box");
        assert_eq!(base_from_pathname(""), "");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("", "/public/a.jpg"), "/public/a.jpg");
        assert_eq!(join_url("", "public/a.jpg"), "/public/a.jpg");
        assert_eq!(join_url("/light-box", "public/a.jpg"), "/light-box/public/a.jpg");
        assert_eq!(join_url("/light-box/", "/public/a.jpg"), "/light-box/public/a.jpg");
        assert_eq!(join_url("/x", "https://cdn.test/a.jpg"), "https://cdn.test/a.jpg");
    }
}
