// src/components/gallery.rs
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::controller::LightBox;
use crate::options::LightBoxOptions;

/// One resolved image of a [`Gallery`].
#[derive(Clone, PartialEq)]
pub struct GalleryEntry {
    pub thumb_url: String,
    pub full_url: Option<String>,
    pub alt: Option<String>,
}

#[derive(Properties, PartialEq)]
pub struct GalleryProps {
    pub images: Vec<GalleryEntry>,
    #[prop_or_default]
    pub options: LightBoxOptions,
    #[prop_or_default]
    pub class: Classes,
}

/// Renders a `light-box` host with its thumbnails and attaches a
/// [`LightBox`] for as long as the component is mounted.
///
/// Changing `images` only re-renders children; the controller's subtree
/// observer picks them up. Changing `options` reconnects.
#[function_component(Gallery)]
pub fn gallery(props: &GalleryProps) -> Html {
    let host_ref = use_node_ref();

    {
        let host_ref = host_ref.clone();
        use_effect_with(props.options.clone(), move |options| {
            let lightbox = host_ref
                .cast::<HtmlElement>()
                .map(|host| LightBox::connect(host, options.clone()));
            move || {
                if let Some(lightbox) = lightbox {
                    lightbox.disconnect();
                }
            }
        });
    }

    html! {
        // Marked ready so the document-level upgrade leaves this host alone.
        <light-box
            ref={host_ref}
            class={classes!("light-box-gallery", props.class.clone())}
            data-light-box-ready=""
        >
            { for props.images.iter().map(|image| html! {
                <img
                    src={image.thumb_url.clone()}
                    alt={image.alt.clone().unwrap_or_default()}
                    data-lightbox-src={image.full_url.clone()}
                    loading="lazy"
                />
            }) }
        </light-box>
    }
}
