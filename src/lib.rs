// src/lib.rs
//! A gallery lightbox for the browser.
//!
//! Images inside a `<light-box>` host (or a Yew [`Gallery`]) become
//! triggers. Activating one grows the image from its thumbnail into a
//! full-screen overlay; Escape, the backdrop or the close button shrink it
//! back, and the arrow keys or buttons page through the gallery.
//!
//! [`Gallery`]: components::gallery::Gallery

pub mod components;
pub mod controller;
pub mod element;
pub mod geometry;
pub mod input;
pub mod manifest;
pub mod motion;
pub mod options;
pub mod overlay;
pub mod registry;
pub mod scroll_lock;
pub mod utils;

pub use controller::{LightBox, TransitionState};
pub use element::{define_light_box, LIGHT_BOX_TAG};
pub use options::LightBoxOptions;
