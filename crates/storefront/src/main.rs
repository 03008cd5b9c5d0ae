//! Leptos Aurum Storefront

use std::sync::Arc;

use aurum::{
    cart::Cart,
    catalog::Catalog,
    currency::CurrencyStore,
    feed::SpotPriceCell,
    modal::{ModalKind, ModalStack},
};
use leptos::prelude::*;
use tracing::{info, warn};

use crate::config::StorefrontConfig;

mod cart;
mod checkout;
mod config;
mod contact;
mod converter;
mod footer;
mod hero;
mod modals;
mod navbar;
mod observability;
mod products;
mod ticker;
mod timing;

/// Shared stores handed to every component that reads or mutates them.
#[derive(Debug, Clone, Copy)]
pub struct Stores {
    /// Shopping cart and drawer flag.
    pub cart: RwSignal<Cart<'static>>,

    /// Active display currency and rates.
    pub currency: RwSignal<CurrencyStore>,

    /// Open blocking overlays.
    pub modals: RwSignal<ModalStack>,

    /// Product shown in the detail and packaging overlays.
    pub selected: RwSignal<Option<String>>,

    /// Live-region announcement signal.
    pub live_message: RwSignal<(u64, String)>,
}

impl Stores {
    fn new(catalog: &Catalog, config: &StorefrontConfig) -> Self {
        Self {
            cart: RwSignal::new(Cart::new(catalog.currency())),
            currency: RwSignal::new(
                CurrencyStore::new(config.rates.clone()).with_currency(config.default_currency),
            ),
            modals: RwSignal::new(ModalStack::default()),
            selected: RwSignal::new(None),
            live_message: RwSignal::new((0, String::new())),
        }
    }

    /// Push an overlay.
    pub fn open_modal(self, kind: ModalKind) {
        self.modals.update(|modals| modals.open(kind));
    }

    /// Close one overlay, forgetting the selected product once neither
    /// product overlay remains.
    pub fn close_modal(self, kind: ModalKind) {
        self.modals.update(|modals| {
            modals.close(kind);
        });

        let product_overlay_open = self.modals.with_untracked(|modals| {
            modals.contains(ModalKind::ProductDetail) || modals.contains(ModalKind::PackagingPicker)
        });

        if !product_overlay_open {
            self.selected.set(None);
        }
    }
}

/// Parsed application data used by the UI.
#[derive(Debug)]
struct AppData {
    /// Product catalog and packaging options.
    catalog: Arc<Catalog>,

    /// Storefront settings.
    config: StorefrontConfig,
}

impl AppData {
    fn load() -> Result<Self, String> {
        let config = StorefrontConfig::bundled().map_err(|error| error.to_string())?;
        let catalog = Catalog::bundled().map_err(|error| error.to_string())?;

        Ok(Self {
            catalog: Arc::new(catalog),
            config,
        })
    }
}

#[component]
fn StorefrontShell(app_data: AppData) -> impl IntoView {
    let AppData { catalog, config } = app_data;

    let cell = match SpotPriceCell::new(config.feed.initial_price) {
        Ok(cell) => cell,
        Err(error) => return error_panel(error.to_string()),
    };

    let stores = Stores::new(&catalog, &config);
    let spot = RwSignal::new(cell.get());

    info!(
        products = catalog.len(),
        currency = %config.default_currency,
        live_feed = config.feed.url.is_some(),
        "storefront ready"
    );

    view! {
        <div class="storefront" class:storefront-locked=move || stores.modals.with(ModalStack::is_open)>
            <p class="sr-only" role="status" aria-live="polite" aria-atomic="true">
                {move || stores.live_message.get().1}
            </p>
            <navbar::Navbar stores=stores />
            <main>
                <hero::Hero stores=stores />
                <ticker::TickerPanel
                    feed=config.feed.clone()
                    cell=cell
                    spot=spot
                    currency=stores.currency
                />
                <products::ProductSection catalog=Arc::clone(&catalog) stores=stores />
                <converter::GramConverter spot=spot currency=stores.currency />
                <contact::InquiryForm stores=stores delay_ms=config.inquiry_delay_ms />
            </main>
            <footer::Footer />
            <cart::CartDrawer stores=stores />
            <modals::ProductDetailModal catalog=Arc::clone(&catalog) stores=stores />
            <modals::PackagingModal catalog=Arc::clone(&catalog) stores=stores />
            <checkout::CheckoutModal stores=stores delay_ms=config.checkout_delay_ms />
        </div>
    }
    .into_any()
}

fn error_panel(error_message: String) -> AnyView {
    view! {
        <main class="storefront-error">
            <h1 class="storefront-error-title">"Aurum"</h1>
            <div class="storefront-error-panel" role="alert">
                <p>{error_message}</p>
            </div>
        </main>
    }
    .into_any()
}

/// Main storefront app shell.
#[component]
fn App(loaded: Result<AppData, String>) -> impl IntoView {
    match loaded {
        Ok(app_data) => view! { <StorefrontShell app_data=app_data /> }.into_any(),
        Err(error_message) => error_panel(error_message),
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let loaded = AppData::load();

    if let Ok(app_data) = &loaded
        && let Err(error) = observability::init_subscriber(&app_data.config)
    {
        warn!(%error, "keeping existing tracing subscriber");
    }

    leptos::mount::mount_to_body(move || view! { <App loaded=loaded /> });
}

fn announce(live_message: RwSignal<(u64, String)>, message: String) {
    live_message.update(|(id, text)| {
        *id = id.saturating_add(1);
        *text = message;
    });
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bundled_data_loads() -> TestResult {
        let app_data = AppData::load()?;

        assert!(!app_data.catalog.is_empty());

        Ok(())
    }

    #[test]
    fn announce_bumps_message_id() {
        let live_message = RwSignal::new((0_u64, String::new()));

        announce(live_message, "Added".to_string());
        announce(live_message, "Added".to_string());

        assert_eq!(live_message.get_untracked(), (2, "Added".to_string()));
    }

    #[test]
    fn closing_last_product_overlay_clears_selection() -> TestResult {
        let app_data = AppData::load()?;
        let stores = Stores::new(&app_data.catalog, &app_data.config);

        stores.selected.set(Some("bar-1".to_string()));
        stores.open_modal(ModalKind::ProductDetail);
        stores.open_modal(ModalKind::PackagingPicker);

        stores.close_modal(ModalKind::PackagingPicker);

        assert_eq!(stores.selected.get_untracked(), Some("bar-1".to_string()));
        assert!(stores.modals.with_untracked(ModalStack::is_open));

        stores.close_modal(ModalKind::ProductDetail);

        assert_eq!(stores.selected.get_untracked(), None);

        Ok(())
    }
}
