use aurum::modal::ModalStack;
use leptos::{html, prelude::*};

use crate::Stores;

/// What the background video should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Video plays behind the hero copy.
    Playing,

    /// Paused while an overlay covers the page.
    Paused,
}

/// Playback state for the current overlays.
pub fn hero_playback(modals: &ModalStack) -> Playback {
    if modals.is_open() {
        Playback::Paused
    } else {
        Playback::Playing
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_playback(video: &web_sys::HtmlVideoElement, playback: Playback) {
    use tracing::debug;

    match playback {
        Playback::Paused => {
            if let Err(error) = video.pause() {
                debug!(?error, "hero video pause failed");
            }
        }
        Playback::Playing => {
            if let Err(error) = video.play() {
                debug!(?error, "hero video play rejected");
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_playback(_video: &web_sys::HtmlVideoElement, _playback: Playback) {}

/// Full-bleed hero with background video.
#[component]
pub fn Hero(
    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let video_ref = NodeRef::<html::Video>::new();

    Effect::new(move |_| {
        let playback = stores.modals.with(hero_playback);

        if let Some(video) = video_ref.get() {
            apply_playback(&video, playback);
        }
    });

    view! {
        <section id="top" class="hero">
            <video
                node_ref=video_ref
                class="hero-video"
                src="/media/hero-pour.mp4"
                poster="/media/hero-poster.webp"
                autoplay=true
                muted=true
                playsinline=true
                aria-hidden="true"
            ></video>
            <div class="hero-copy">
                <p class="hero-eyebrow">"Investment-grade bullion"</p>
                <h1 class="hero-title">"Gold, struck to last generations."</h1>
                <p class="hero-lede">
                    "Certified bars and coins from accredited refiners, dispatched insured and presented in a complimentary case."
                </p>
                <a class="button button-primary" href="#collection">"View the collection"</a>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use aurum::modal::ModalKind;

    use super::*;

    #[test]
    fn plays_without_overlays() {
        assert_eq!(hero_playback(&ModalStack::default()), Playback::Playing);
    }

    #[test]
    fn pauses_under_any_overlay() {
        let mut modals = ModalStack::default();
        modals.open(ModalKind::Inquiry);

        assert_eq!(hero_playback(&modals), Playback::Paused);

        modals.close(ModalKind::Inquiry);

        assert_eq!(hero_playback(&modals), Playback::Playing);
    }
}
