use leptos::prelude::*;

use crate::navbar::NAV_LINKS;

/// Site footer.
#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <div class="site-footer-brand">
                <p class="site-footer-logo">"AURUM"</p>
                <p class="site-footer-tagline">"Accredited bullion, insured delivery."</p>
            </div>
            <nav class="site-footer-links" aria-label="Footer">
                {NAV_LINKS
                    .into_iter()
                    .map(|(href, label)| view! { <a href=href>{label}</a> })
                    .collect_view()}
            </nav>
            <p class="site-footer-legal">
                "Prices are indicative and move with the gold spot market. Orders are confirmed at the price shown at checkout."
            </p>
        </footer>
    }
}
