use aurum::{cart::Cart, currency::DisplayCurrency};
use leptos::prelude::*;
use tracing::debug;

use crate::{Stores, announce, cart::badge_text};

/// In-page sections linked from the navbar, as `(anchor, label)`.
pub const NAV_LINKS: [(&str, &str); 4] = [
    ("#collection", "Collection"),
    ("#ticker", "Spot Price"),
    ("#converter", "Converter"),
    ("#contact", "Contact"),
];

#[component]
fn CurrencyPicker(stores: Stores) -> impl IntoView {
    view! {
        <label class="currency-picker">
            <span class="sr-only">"Display currency"</span>
            <select on:change=move |event| {
                let value = event_target_value(&event);

                match value.parse::<DisplayCurrency>() {
                    Ok(currency) => {
                        stores.currency.update(|store| store.set_currency(currency));
                        announce(stores.live_message, format!("Prices shown in {currency}."));
                    }
                    Err(error) => debug!(%error, "ignored currency selection"),
                }
            }>
                {DisplayCurrency::ALL
                    .into_iter()
                    .map(|currency| {
                        view! {
                            <option
                                value=currency.code()
                                selected=move || stores.currency.with(|store| store.currency() == currency)
                            >
                                {currency.code()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </label>
    }
}

/// Top navigation bar.
#[component]
pub fn Navbar(
    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let badge = move || stores.cart.with(|cart| badge_text(cart.total_items()));

    view! {
        <header class="navbar">
            <a class="navbar-brand" href="#top">"AURUM"</a>
            <nav class="navbar-links" aria-label="Sections">
                {NAV_LINKS
                    .into_iter()
                    .map(|(href, label)| view! { <a href=href>{label}</a> })
                    .collect_view()}
            </nav>
            <div class="navbar-actions">
                <CurrencyPicker stores=stores />
                <button
                    type="button"
                    class="navbar-cart"
                    aria-controls="cart-drawer"
                    aria-expanded=move || stores.cart.with(Cart::is_open).to_string()
                    aria-label=move || {
                        let count = stores.cart.with(Cart::total_items);
                        format!("Open cart, {count} items")
                    }
                    on:click=move |_| stores.cart.update(Cart::toggle)
                >
                    "Cart"
                    {move || badge().map(|text| view! { <span class="navbar-cart-badge">{text}</span> })}
                </button>
            </div>
        </header>
    }
}
