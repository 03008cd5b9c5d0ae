use std::sync::Arc;

use aurum::{
    cart::{Cart, CartError, NewCartItem},
    catalog::{Catalog, PackagingOption},
    modal::ModalKind,
    products::Product,
};
use leptos::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::{Stores, announce};

/// Errors raised when adding from the product overlays.
#[derive(Debug, Error)]
pub enum AddToCartError {
    /// No product has this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// No packaging option has this id.
    #[error("Unknown packaging option: {0}")]
    UnknownPackaging(String),

    /// The product cannot currently be ordered.
    #[error("{0} is sold out")]
    SoldOut(String),

    /// The cart refused the item.
    #[error(transparent)]
    Cart(#[from] CartError),
}

fn orderable<'c>(catalog: &'c Catalog, product_id: &str) -> Result<&'c Product<'static>, AddToCartError> {
    let product = catalog
        .get(product_id)
        .ok_or_else(|| AddToCartError::UnknownProduct(product_id.to_string()))?;

    if !product.in_stock {
        return Err(AddToCartError::SoldOut(product.name.clone()));
    }

    Ok(product)
}

/// Add one unit of a product and return the announcement for it.
///
/// # Errors
///
/// Returns an [`AddToCartError`] if the product is unknown, sold out, or
/// rejected by the cart.
pub fn add_product(
    cart: &mut Cart<'static>,
    catalog: &Catalog,
    product_id: &str,
) -> Result<String, AddToCartError> {
    let product = orderable(catalog, product_id)?;
    let quantity = cart.add_item(NewCartItem::from_product(product))?;

    Ok(format!("Added {} to cart ({quantity} in cart).", product.name))
}

/// Add one unit of a product together with a complimentary box.
///
/// # Errors
///
/// Returns an [`AddToCartError`] if the product or packaging option is
/// unknown, the product is sold out, or the cart rejects either line.
pub fn add_product_with_box(
    cart: &mut Cart<'static>,
    catalog: &Catalog,
    product_id: &str,
    packaging_id: &str,
) -> Result<String, AddToCartError> {
    let product = orderable(catalog, product_id)?;
    let option = catalog
        .packaging_option(packaging_id)
        .ok_or_else(|| AddToCartError::UnknownPackaging(packaging_id.to_string()))?;

    cart.add_with_packaging(
        NewCartItem::from_product(product),
        NewCartItem::packaging_for(product, option),
    )?;

    Ok(format!("Added {} with {} to cart.", product.name, option.name))
}

fn selected_product(stores: Stores, catalog: &Catalog, kind: ModalKind) -> Option<Product<'static>> {
    if !stores.modals.with(|modals| modals.contains(kind)) {
        return None;
    }

    let product_id = stores.selected.get()?;

    catalog.get(&product_id).cloned()
}

fn finish_adding(stores: Stores, outcome: Option<Result<String, AddToCartError>>, error: RwSignal<Option<String>>) {
    match outcome {
        Some(Ok(message)) => {
            info!(%message, "added to cart");
            error.set(None);
            stores.close_modal(ModalKind::PackagingPicker);
            stores.close_modal(ModalKind::ProductDetail);
            stores.cart.update(Cart::open);
            announce(stores.live_message, message);
        }
        Some(Err(add_error)) => {
            warn!(error = %add_error, "add to cart rejected");
            error.set(Some(add_error.to_string()));
        }
        None => {}
    }
}

#[component]
pub(crate) fn ModalFrame(
    stores: Stores,
    kind: ModalKind,
    title: String,
    children: Children,
) -> impl IntoView {
    let label = title.clone();

    view! {
        <div class="modal-backdrop" on:click=move |_| stores.close_modal(kind)></div>
        <div class="modal" role="dialog" aria-modal="true" aria-label=label>
            <header class="modal-header">
                <h2 class="modal-title">{title}</h2>
                <button
                    type="button"
                    class="modal-close"
                    aria-label="Close"
                    on:click=move |_| stores.close_modal(kind)
                >
                    "×"
                </button>
            </header>
            <div class="modal-body">{children()}</div>
        </div>
    }
}

/// Full product sheet with gallery and add-to-cart actions.
#[component]
pub fn ProductDetailModal(
    /// Shared catalog.
    catalog: Arc<Catalog>,

    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let error = RwSignal::new(None::<String>);

    move || {
        let product = selected_product(stores, &catalog, ModalKind::ProductDetail)?;
        let catalog = Arc::clone(&catalog);
        let product_id = product.id.clone();
        let price = stores.currency.with(|currency| currency.format_money(&product.price));
        let sold_out = !product.in_stock;

        Some(view! {
            <ModalFrame stores=stores kind=ModalKind::ProductDetail title=product.name.clone()>
                <div class="product-detail">
                    <div class="product-detail-gallery">
                        {product
                            .images
                            .iter()
                            .map(|src| view! { <img class="product-detail-image" src=src.clone() alt="" /> })
                            .collect_view()}
                    </div>
                    <div class="product-detail-copy">
                        <p class="product-detail-category">{product.category.label()}</p>
                        <p class="product-detail-description">{product.description.clone()}</p>
                        <dl class="product-detail-facts">
                            <dt>"Metal"</dt>
                            <dd>{product.metal.clone()}</dd>
                            <dt>"Weight"</dt>
                            <dd>{product.weight.clone()}</dd>
                            <dt>"Fineness"</dt>
                            <dd>{product.purity.clone()}</dd>
                        </dl>
                        <p class="product-detail-price">{price}</p>
                        {move || error.get().map(|message| view! { <p class="form-error" role="alert">{message}</p> })}
                        <div class="product-detail-actions">
                            <button
                                type="button"
                                class="button button-primary"
                                disabled=sold_out
                                on:click=move |_| {
                                    let outcome = stores
                                        .cart
                                        .try_update(|cart| add_product(cart, &catalog, &product_id));
                                    finish_adding(stores, outcome, error);
                                }
                            >
                                {if sold_out { "Sold out" } else { "Add to cart" }}
                            </button>
                            <button
                                type="button"
                                class="button button-secondary"
                                disabled=sold_out
                                on:click=move |_| {
                                    error.set(None);
                                    stores.open_modal(ModalKind::PackagingPicker);
                                }
                            >
                                "Choose complimentary box"
                            </button>
                        </div>
                    </div>
                </div>
            </ModalFrame>
        })
    }
}

#[component]
fn PackagingChoice(
    option: PackagingOption,
    product_id: String,
    catalog: Arc<Catalog>,
    stores: Stores,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let option_id = option.id.clone();

    view! {
        <li class="packaging-option">
            <button
                type="button"
                class="packaging-option-button"
                on:click=move |_| {
                    let outcome = stores.cart.try_update(|cart| {
                        add_product_with_box(cart, &catalog, &product_id, &option_id)
                    });
                    finish_adding(stores, outcome, error);
                }
            >
                {(!option.image.is_empty()).then(|| view! { <img class="packaging-option-image" src=option.image.clone() alt="" /> })}
                <span class="packaging-option-name">{option.name.clone()}</span>
                <span class="packaging-option-description">{option.description.clone()}</span>
                <span class="packaging-option-price">"Complimentary"</span>
            </button>
        </li>
    }
}

/// Complimentary box picker stacked over the product sheet.
#[component]
pub fn PackagingModal(
    /// Shared catalog.
    catalog: Arc<Catalog>,

    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let error = RwSignal::new(None::<String>);

    move || {
        let product = selected_product(stores, &catalog, ModalKind::PackagingPicker)?;
        let title = format!("A case for your {}", product.name);
        let options = catalog.packaging().to_vec();
        let catalog = Arc::clone(&catalog);

        Some(view! {
            <ModalFrame stores=stores kind=ModalKind::PackagingPicker title=title>
                {move || error.get().map(|message| view! { <p class="form-error" role="alert">{message}</p> })}
                <ul class="packaging-options">
                    {options
                        .into_iter()
                        .map(|option| {
                            view! {
                                <PackagingChoice
                                    option=option
                                    product_id=product.id.clone()
                                    catalog=Arc::clone(&catalog)
                                    stores=stores
                                    error=error
                                />
                            }
                        })
                        .collect_view()}
                </ul>
            </ModalFrame>
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn adding_twice_increments_one_line() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(catalog.currency());

        add_product(&mut cart, &catalog, "coin-1")?;
        let message = add_product(&mut cart, &catalog, "coin-1")?;

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert!(message.contains("(2 in cart)"));

        Ok(())
    }

    #[test]
    fn box_is_added_alongside_product() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(catalog.currency());

        let message = add_product_with_box(&mut cart, &catalog, "bar-1", "walnut")?;

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items(), 1);
        assert!(cart.get("box-bar-1").is_some_and(|line| line.is_box));
        assert!(message.starts_with("Added Fine Gold Bar 50 g with "));

        Ok(())
    }

    #[test]
    fn sold_out_products_are_refused() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(catalog.currency());

        let result = add_product(&mut cart, &catalog, "bar-3");

        assert!(matches!(result, Err(AddToCartError::SoldOut(_))));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_packaging_adds_nothing() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(catalog.currency());

        let result = add_product_with_box(&mut cart, &catalog, "bar-1", "velvet");

        assert!(matches!(result, Err(AddToCartError::UnknownPackaging(id)) if id == "velvet"));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_products_are_reported() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(catalog.currency());

        let result = add_product(&mut cart, &catalog, "bar-99");

        assert!(matches!(result, Err(AddToCartError::UnknownProduct(id)) if id == "bar-99"));

        Ok(())
    }
}
