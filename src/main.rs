// src/main.rs
use gloo_net::http::Request;
use light_box::components::gallery::{Gallery, GalleryEntry};
use light_box::manifest::{GalleryManifest, KNOWN_GALLERIES};
use light_box::utils::resource_url;
use yew::prelude::*;

/// Class on `<html>` that hides galleries until the element is upgraded.
const FOUCE_CLASS: &str = "reduce-fouce";

pub enum AppMsg {
    ChangeGallery(String),
    ManifestsLoaded(Vec<GalleryManifest>),
    ManifestLoadFailed(String),
}

pub struct App {
    current_gallery: String,
    galleries: Vec<GalleryManifest>,
    loading: bool,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_future(async {
            match load_all_manifests().await {
                Ok(manifests) => AppMsg::ManifestsLoaded(manifests),
                Err(e) => AppMsg::ManifestLoadFailed(e),
            }
        });

        Self {
            current_gallery: String::new(),
            galleries: Vec::new(),
            loading: true,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ChangeGallery(id) => {
                self.current_gallery = id;
                true
            }
            AppMsg::ManifestsLoaded(manifests) => {
                self.galleries = manifests;
                self.loading = false;
                if let Some(first) = self.galleries.first() {
                    self.current_gallery = first.id.clone();
                }
                true
            }
            AppMsg::ManifestLoadFailed(error) => {
                log::error!("Failed to load gallery manifests: {}", error);
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! {
                <main class="app-main">
                    <div class="loading">{"Loading galleries..."}</div>
                </main>
            };
        }

        if self.galleries.is_empty() {
            return html! {
                <main class="app-main">
                    <div class="error">{"No galleries found. Add a manifest.json under public/galleries/<id>/."}</div>
                </main>
            };
        }

        let on_gallery_change = ctx.link().callback(AppMsg::ChangeGallery);
        let current = self
            .galleries
            .iter()
            .find(|g| g.id == self.current_gallery)
            .cloned();

        html! {
            <main class="app-main">
                <div class="gallery-selector">
                    <label for="gallery-select">{"Gallery: "}</label>
                    <select
                        id="gallery-select"
                        onchange={Callback::from(move |e: Event| {
                            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
                                on_gallery_change.emit(select.value());
                            }
                        })}
                    >
                        {for self.galleries.iter().map(|gallery| html! {
                            <option
                                value={gallery.id.clone()}
                                selected={self.current_gallery == gallery.id}
                            >
                                {format!("{} ({})", gallery.title, gallery.image_count())}
                            </option>
                        })}
                    </select>
                </div>

                {
                    match current {
                        Some(manifest) => html! {
                            <section class="gallery">
                                <h2>{manifest.title.clone()}</h2>
                                <p class="description">{manifest.description.clone()}</p>
                                <Gallery
                                    key={manifest.id.clone()}
                                    images={gallery_entries(&manifest)}
                                    options={manifest.options.clone()}
                                />
                            </section>
                        },
                        None => html! {},
                    }
                }
            </main>
        }
    }
}

fn gallery_entries(manifest: &GalleryManifest) -> Vec<GalleryEntry> {
    manifest
        .images
        .iter()
        .map(|image| GalleryEntry {
            thumb_url: resource_url(&manifest.asset_path(&image.src)),
            full_url: image
                .full_src
                .as_deref()
                .map(|full| resource_url(&manifest.asset_path(full))),
            alt: image.alt.clone(),
        })
        .collect()
}

async fn load_all_manifests() -> Result<Vec<GalleryManifest>, String> {
    let mut manifests = Vec::new();

    for gallery_id in KNOWN_GALLERIES {
        let manifest_url = resource_url(&GalleryManifest::manifest_path(gallery_id));

        match Request::get(&manifest_url).send().await {
            Ok(resp) if resp.ok() => match resp.json::<GalleryManifest>().await {
                Ok(manifest) => {
                    log::info!("Loaded manifest for gallery: {}", gallery_id);
                    manifests.push(manifest);
                }
                Err(e) => {
                    log::warn!("Failed to parse manifest for {}: {:?}", gallery_id, e);
                }
            },
            Ok(_) => {
                log::warn!("Manifest not found for gallery: {}", gallery_id);
            }
            Err(e) => {
                log::warn!("Failed to fetch manifest for {}: {:?}", gallery_id, e);
            }
        }
    }

    if manifests.is_empty() {
        Err("No gallery manifests could be loaded".to_string())
    } else {
        Ok(manifests)
    }
}

fn reveal_page() {
    let _ = gloo::utils::document_element()
        .class_list()
        .remove_1(FOUCE_CLASS);
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    // Static <light-box> markup in index.html is upgraded directly; the Yew
    // app mounts its own galleries below.
    light_box::define_light_box();
    reveal_page();

    yew::Renderer::<App>::new().render();
}
