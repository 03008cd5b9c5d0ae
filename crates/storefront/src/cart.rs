use aurum::{
    cart::{BOX_ID_PREFIX, Cart, CartItem, QuantityChange},
    currency::CurrencyStore,
    modal::ModalKind,
};
use leptos::prelude::*;
use tracing::debug;

use crate::{Stores, announce};

/// Label shown in place of a price for packaging lines.
pub const COMPLIMENTARY_LABEL: &str = "Complimentary";

/// UI model for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Line id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Weight, fineness and metal.
    pub detail: String,

    /// Unit price in the display currency, or the complimentary label.
    pub unit_price: String,

    /// Line total in the display currency, or the complimentary label.
    pub line_total: String,

    /// Units on the line.
    pub quantity: u32,

    /// Whether +/- controls are offered.
    pub adjustable: bool,

    /// Image reference.
    pub image: Option<String>,
}

fn line_detail(item: &CartItem<'_>) -> String {
    [item.weight.as_str(), item.purity.as_str(), item.metal.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Build line models in cart order.
pub fn cart_lines(cart: &Cart<'_>, currency: &CurrencyStore) -> Vec<CartLineView> {
    cart.iter()
        .map(|item| {
            let (unit_price, line_total) = if item.is_box {
                (COMPLIMENTARY_LABEL.to_string(), COMPLIMENTARY_LABEL.to_string())
            } else {
                (
                    currency.format_money(&item.price),
                    currency.format_price(item.line_total()),
                )
            };

            CartLineView {
                id: item.id.clone(),
                name: item.name.clone(),
                detail: if item.is_box {
                    "Packaging".to_string()
                } else {
                    line_detail(item)
                },
                unit_price,
                line_total,
                quantity: item.quantity(),
                adjustable: !item.is_box,
                image: item.image.clone(),
            }
        })
        .collect()
}

/// Badge text for the navbar cart button; hidden when empty.
pub fn badge_text(total_items: u32) -> Option<String> {
    match total_items {
        0 => None,
        1..=99 => Some(total_items.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// Remove a line, taking its packaging line with it.
pub fn remove_line<'a>(cart: &mut Cart<'a>, id: &str) -> Option<CartItem<'a>> {
    let removed = cart.remove_item(id)?;

    if !removed.is_box {
        drop_packaging(cart, id);
    }

    Some(removed)
}

/// Take one unit off a line; packaging goes when the last unit does.
pub fn decrement_line(cart: &mut Cart<'_>, id: &str) -> QuantityChange {
    let change = cart.decrement(id);

    if change == QuantityChange::Removed {
        drop_packaging(cart, id);
    }

    change
}

fn drop_packaging(cart: &mut Cart<'_>, product_id: &str) {
    let packaging_id = format!("{BOX_ID_PREFIX}{product_id}");

    if cart.remove_item(&packaging_id).is_some() {
        debug!(id = %packaging_id, "packaging line removed with its product");
    }
}

fn change_message(name: &str, change: QuantityChange) -> Option<String> {
    match change {
        QuantityChange::Updated(quantity) => Some(format!("{name} quantity {quantity}.")),
        QuantityChange::Removed => Some(format!("Removed {name} from cart.")),
        QuantityChange::Missing => None,
    }
}

#[component]
fn QuantityControls(line: CartLineView, stores: Stores) -> impl IntoView {
    let decrement_id = line.id.clone();
    let increment_id = line.id.clone();
    let decrement_name = line.name.clone();
    let increment_name = line.name.clone();

    view! {
        <div class="cart-line-quantity">
            <button
                type="button"
                class="icon-button icon-button-secondary icon-button-compact"
                aria-label=format!("Remove one {}", line.name)
                on:click=move |_| {
                    let change = stores.cart.try_update(|cart| decrement_line(cart, &decrement_id));

                    if let Some(message) = change.and_then(|change| change_message(&decrement_name, change)) {
                        announce(stores.live_message, message);
                    }
                }
            >
                "−"
            </button>
            <span class="cart-line-count">{line.quantity}</span>
            <button
                type="button"
                class="icon-button icon-button-secondary icon-button-compact"
                aria-label=format!("Add one {}", line.name)
                on:click=move |_| {
                    let change = stores.cart.try_update(|cart| cart.increment(&increment_id));

                    if let Some(message) = change.and_then(|change| change_message(&increment_name, change)) {
                        announce(stores.live_message, message);
                    }
                }
            >
                "+"
            </button>
        </div>
    }
}

#[component]
fn CartLine(line: CartLineView, stores: Stores) -> impl IntoView {
    let remove_id = line.id.clone();
    let remove_name = line.name.clone();

    let controls = if line.adjustable {
        view! { <QuantityControls line=line.clone() stores=stores /> }.into_any()
    } else {
        view! { <span class="cart-line-count cart-line-count-fixed">{format!("× {}", line.quantity)}</span> }
            .into_any()
    };

    view! {
        <li class="cart-line" class:cart-line-box=!line.adjustable>
            {line.image.clone().map(|src| view! { <img class="cart-line-image" src=src alt="" /> })}
            <div class="cart-line-body">
                <p class="cart-line-name">{line.name.clone()}</p>
                <p class="cart-line-detail">{line.detail.clone()}</p>
                <p class="cart-line-price">{line.unit_price.clone()}</p>
            </div>
            {controls}
            <p class="cart-line-total">{line.line_total.clone()}</p>
            <button
                type="button"
                class="cart-line-remove"
                aria-label=format!("Remove {} from cart", line.name)
                on:click=move |_| {
                    let removed = stores
                        .cart
                        .try_update(|cart| remove_line(cart, &remove_id))
                        .flatten();

                    if removed.is_some() {
                        debug!(id = %remove_id, "cart line removed");
                        announce(stores.live_message, format!("Removed {remove_name} from cart."));
                    }
                }
            >
                "Remove"
            </button>
        </li>
    }
}

/// Slide-out cart drawer.
#[component]
pub fn CartDrawer(
    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let is_open = move || stores.cart.with(Cart::is_open);

    let lines = move || {
        let lines = stores
            .currency
            .with(|currency| stores.cart.with(|cart| cart_lines(cart, currency)));

        if lines.is_empty() {
            return view! { <p class="cart-empty">"Your cart is empty."</p> }.into_any();
        }

        view! {
            <ul class="cart-lines">
                {lines
                    .into_iter()
                    .map(|line| view! { <CartLine line=line stores=stores /> })
                    .collect_view()}
            </ul>
        }
        .into_any()
    };

    let subtotal = move || {
        stores
            .currency
            .with(|currency| stores.cart.with(|cart| currency.format_money(&cart.total_price())))
    };

    view! {
        <div
            class="cart-overlay"
            class:cart-overlay-open=is_open
            on:click=move |_| stores.cart.update(Cart::close)
        ></div>
        <aside
            id="cart-drawer"
            class="cart-drawer"
            class:cart-drawer-open=is_open
            aria-hidden=move || (!is_open()).to_string()
            aria-label="Shopping cart"
        >
            <header class="cart-drawer-header">
                <h2>"Your Cart"</h2>
                <button
                    type="button"
                    class="cart-drawer-close"
                    aria-label="Close cart"
                    on:click=move |_| stores.cart.update(Cart::close)
                >
                    "×"
                </button>
            </header>
            {lines}
            <footer class="cart-drawer-footer">
                <div class="cart-subtotal">
                    <span>"Subtotal"</span>
                    <span>{subtotal}</span>
                </div>
                <button
                    type="button"
                    class="button button-primary"
                    disabled=move || stores.cart.with(|cart| cart.total_items() == 0)
                    on:click=move |_| {
                        stores.cart.update(Cart::close);
                        stores.open_modal(ModalKind::Checkout);
                    }
                >
                    "Checkout"
                </button>
                <button
                    type="button"
                    class="button button-ghost"
                    disabled=move || stores.cart.with(Cart::is_empty)
                    on:click=move |_| {
                        stores.cart.update(Cart::clear);
                        announce(stores.live_message, "Cart cleared.".to_string());
                    }
                >
                    "Clear cart"
                </button>
            </footer>
        </aside>
    }
}
