// src/manifest.rs
use serde::{Deserialize, Serialize};

use crate::options::LightBoxOptions;

/// A gallery described by `public/galleries/<id>/manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub images: Vec<GalleryImage>,
    #[serde(default)]
    pub options: LightBoxOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Thumbnail, relative to the gallery directory.
    pub src: String,
    /// Higher resolution file shown in the overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl GalleryManifest {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            images: Vec::new(),
            options: LightBoxOptions::default(),
        }
    }

    pub fn manifest_path(id: &str) -> String {
        format!("public/galleries/{}/manifest.json", id)
    }

    /// Path of a file inside this gallery's directory. Absolute URLs and
    /// `data:` URIs are returned unchanged.
    pub fn asset_path(&self, file: &str) -> String {
        if file.contains("://") || file.starts_with("data:") || file.starts_with('/') {
            return file.to_string();
        }
        format!("public/galleries/{}/{}", self.id, file)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl GalleryImage {
    pub fn new(src: String) -> Self {
        Self {
            src,
            full_src: None,
            alt: None,
        }
    }

    pub fn with_full_src(mut self, full_src: String) -> Self {
        self.full_src = Some(full_src);
        self
    }

    pub fn with_alt(mut self, alt: String) -> Self {
        self.alt = Some(alt);
        self
    }
}

/// Gallery ids the demo looks for under `public/galleries/`.
pub const KNOWN_GALLERIES: &[&str] = &["example", "landscapes"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_manifest() {
        let manifest = GalleryManifest::new("TEST".to_string(), "Test Gallery".to_string());
        assert_eq!(manifest.id, "TEST");
        assert_eq!(manifest.title, "Test Gallery");
        assert_eq!(manifest.image_count(), 0);
    }

    #[test]
    fn test_gallery_image() {
        let image = GalleryImage::new("a.jpg".to_string())
            .with_full_src("a-large.jpg".to_string())
            .with_alt("A hill".to_string());
        assert_eq!(image.src, "a.jpg");
        assert_eq!(image.full_src.as_deref(), Some("a-large.jpg"));
        assert_eq!(image.alt.as_deref(), Some("A hill"));
    }

    #[test]
    fn test_paths() {
        let manifest = GalleryManifest::new("TEST".to_string(), "Test".to_string());
        assert_eq!(
            GalleryManifest::manifest_path("TEST"),
            "public/galleries/TEST/manifest.json"
        );
        assert_eq!(manifest.asset_path("1.jpg"), "public/galleries/TEST/1.jpg");
        assert_eq!(
            manifest.asset_path("https://example.org/1.jpg"),
            "https://example.org/1.jpg"
        );
        assert_eq!(manifest.asset_path("/shared/1.jpg"), "/shared/1.jpg");
    }

    #[test]
    fn test_parse_manifest_json() {
        let json = r#"{
            "id": "landscapes",
            "title": "Landscapes",
            "images": [
                { "src": "1.jpg", "full_src": "1-full.jpg", "alt": "Dunes" },
                { "src": "2.jpg" }
            ],
            "options": { "transitionMs": 250 }
        }"#;
        let manifest: GalleryManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.image_count(), 2);
        assert_eq!(manifest.description, "");
        assert_eq!(manifest.images[0].full_src.as_deref(), Some("1-full.jpg"));
        assert_eq!(manifest.images[1].alt, None);
        assert_eq!(manifest.options.transition_ms, 250);
        assert_eq!(manifest.options.fade_ms, 120);
    }
}
