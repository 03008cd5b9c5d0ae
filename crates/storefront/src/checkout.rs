use aurum::{
    cart::Cart,
    checkout::{CheckoutError, CheckoutService, OrderRequest, PaymentMethod, ShippingDetails, SimulatedCheckout},
    modal::ModalKind,
    validation::{Field, ValidationErrors},
};
use leptos::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    Stores, announce,
    contact::{TextField, input_type},
    modals::ModalFrame,
    timing::{Generation, spawn, wait_for_timeout},
};

/// Shipping fields in form order.
pub const SHIPPING_FIELDS: [Field; 6] = [
    Field::Name,
    Field::Email,
    Field::Phone,
    Field::Address,
    Field::City,
    Field::Country,
];

/// Progress of a simulated order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatus {
    /// Filling in the form.
    #[default]
    Idle,

    /// Order in flight.
    Placing,

    /// Accepted; total already formatted for display.
    Confirmed {
        /// Order reference.
        reference: String,

        /// Display total.
        total: String,
    },

    /// Refused for a reason other than field validation.
    Failed(String),
}

/// Snapshot the cart into an order request.
pub fn build_order(cart: &Cart<'_>, shipping: ShippingDetails, payment: PaymentMethod) -> OrderRequest {
    OrderRequest {
        lines: cart.snapshot(),
        shipping,
        payment,
    }
}

/// Shopper-facing text for a refused order.
pub fn checkout_message(error: &CheckoutError) -> String {
    match error {
        CheckoutError::EmptyOrder => "Your cart has no bullion yet.".to_string(),
        CheckoutError::Invalid(errors) => format!("Please check the form: {errors}."),
        CheckoutError::UnknownPaymentMethod(_) | CheckoutError::Rejected(_) => error.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
struct ShippingFields {
    full_name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    address: RwSignal<String>,
    city: RwSignal<String>,
    country: RwSignal<String>,
}

impl ShippingFields {
    fn new() -> Self {
        Self {
            full_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            city: RwSignal::new(String::new()),
            country: RwSignal::new(String::new()),
        }
    }

    fn signal(self, field: Field) -> RwSignal<String> {
        match field {
            Field::Email => self.email,
            Field::Phone => self.phone,
            Field::Address => self.address,
            Field::City => self.city,
            Field::Country => self.country,
            Field::Name | Field::Company | Field::Message => self.full_name,
        }
    }

    fn details(self) -> ShippingDetails {
        ShippingDetails {
            full_name: self.full_name.get_untracked(),
            email: self.email.get_untracked(),
            phone: self.phone.get_untracked(),
            address: self.address.get_untracked(),
            city: self.city.get_untracked(),
            country: self.country.get_untracked(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CheckoutState {
    fields: ShippingFields,
    payment: RwSignal<PaymentMethod>,
    errors: RwSignal<ValidationErrors>,
    status: RwSignal<OrderStatus>,
    generation: Generation,
}

fn place_order(stores: Stores, state: CheckoutState, delay_ms: i32) {
    if state.status.with_untracked(|status| *status == OrderStatus::Placing) {
        return;
    }

    let order = stores.cart.with_untracked(|cart| {
        build_order(cart, state.fields.details(), state.payment.get_untracked())
    });

    if !order.has_goods() {
        state.status.set(OrderStatus::Failed(checkout_message(&CheckoutError::EmptyOrder)));
        return;
    }

    if let Err(errors) = order.shipping.validate() {
        debug!(errors = errors.len(), "shipping form incomplete");
        announce(stores.live_message, errors.to_string());
        state.errors.set(errors);
        return;
    }

    state.errors.set(ValidationErrors::default());
    state.status.set(OrderStatus::Placing);

    let run_id = state.generation.bump();

    spawn(async move {
        wait_for_timeout(delay_ms).await;

        if !state.generation.is_current(run_id) {
            return;
        }

        let outcome = SimulatedCheckout.place_order(order).await;

        if !state.generation.is_current(run_id) {
            return;
        }

        match outcome {
            Ok(confirmation) => {
                let total = stores
                    .currency
                    .with_untracked(|currency| currency.format_price(confirmation.total));

                info!(reference = %confirmation.reference, "checkout confirmed");

                stores.cart.update(Cart::clear);
                announce(
                    stores.live_message,
                    format!("Order {} confirmed.", confirmation.reference),
                );
                state.status.set(OrderStatus::Confirmed {
                    reference: confirmation.reference,
                    total,
                });
            }
            Err(CheckoutError::Invalid(errors)) => {
                state.errors.set(errors);
                state.status.set(OrderStatus::Idle);
            }
            Err(error) => {
                warn!(%error, "checkout refused");
                state.status.set(OrderStatus::Failed(checkout_message(&error)));
            }
        }
    });
}

#[component]
fn PaymentPicker(payment: RwSignal<PaymentMethod>) -> impl IntoView {
    view! {
        <fieldset class="payment-methods">
            <legend>"Payment"</legend>
            {PaymentMethod::ALL
                .into_iter()
                .map(|method| {
                    view! {
                        <label class="payment-method">
                            <input
                                type="radio"
                                name="payment"
                                value=method.key()
                                prop:checked=move || payment.get() == method
                                on:change=move |event| {
                                    match event_target_value(&event).parse::<PaymentMethod>() {
                                        Ok(method) => payment.set(method),
                                        Err(error) => debug!(%error, "ignored payment selection"),
                                    }
                                }
                            />
                            <span>{method.label()}</span>
                        </label>
                    }
                })
                .collect_view()}
        </fieldset>
    }
}

fn order_total(stores: Stores) -> String {
    stores.currency.with(|currency| {
        stores.cart.with(|cart| currency.format_money(&cart.total_price()))
    })
}

#[component]
fn CheckoutBody(stores: Stores, state: CheckoutState, delay_ms: i32) -> impl IntoView {
    let is_placing = move || state.status.with(|status| *status == OrderStatus::Placing);

    move || match state.status.get() {
        OrderStatus::Confirmed { reference, total } => view! {
            <div class="checkout-confirmation" role="status">
                <p class="checkout-confirmation-title">"Thank you for your order."</p>
                <p>{format!("Reference {reference}")}</p>
                <p>{format!("Total {total}")}</p>
                <button
                    type="button"
                    class="button button-primary"
                    on:click=move |_| {
                        state.status.set(OrderStatus::Idle);
                        stores.close_modal(ModalKind::Checkout);
                    }
                >
                    "Continue browsing"
                </button>
            </div>
        }
        .into_any(),
        status => view! {
            <form
                class="checkout-form"
                novalidate=true
                on:submit=move |event| {
                    event.prevent_default();
                    place_order(stores, state, delay_ms);
                }
            >
                {SHIPPING_FIELDS
                    .into_iter()
                    .map(|field| {
                        view! {
                            <TextField
                                field=field
                                value=state.fields.signal(field)
                                errors=state.errors
                                input_type={input_type(field)}
                            />
                        }
                    })
                    .collect_view()}
                <PaymentPicker payment=state.payment />
                <div class="checkout-total">
                    <span>"Total"</span>
                    <span>{move || order_total(stores)}</span>
                </div>
                {match status {
                    OrderStatus::Failed(message) => Some(view! { <p class="form-error" role="alert">{message}</p> }),
                    OrderStatus::Idle | OrderStatus::Placing | OrderStatus::Confirmed { .. } => None,
                }}
                <button type="submit" class="button button-primary" disabled=is_placing>
                    {move || if is_placing() { "Placing order…" } else { "Place order" }}
                </button>
            </form>
        }
        .into_any(),
    }
}

/// Checkout overlay opened from the cart drawer.
#[component]
pub fn CheckoutModal(
    /// Shared stores.
    stores: Stores,

    /// Simulated round-trip delay.
    delay_ms: i32,
) -> impl IntoView {
    let state = CheckoutState {
        fields: ShippingFields::new(),
        payment: RwSignal::new(PaymentMethod::default()),
        errors: RwSignal::new(ValidationErrors::default()),
        status: RwSignal::new(OrderStatus::default()),
        generation: Generation::new(),
    };
    state.generation.cancel_on_cleanup();

    Effect::new(move |_| {
        let open = stores.modals.with(|modals| modals.contains(ModalKind::Checkout));
        let settled = state.status.with_untracked(|status| {
            matches!(status, OrderStatus::Confirmed { .. } | OrderStatus::Failed(_))
        });

        if !open && settled {
            state.status.set(OrderStatus::Idle);
        }
    });

    move || {
        stores
            .modals
            .with(|modals| modals.contains(ModalKind::Checkout))
            .then(|| {
                view! {
                    <ModalFrame stores=stores kind=ModalKind::Checkout title="Secure checkout".to_string()>
                        <CheckoutBody stores=stores state=state delay_ms=delay_ms />
                    </ModalFrame>
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use aurum::{cart::NewCartItem, catalog::Catalog};
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_snapshots_every_line() -> TestResult {
        let catalog = Catalog::bundled()?;
        let bar = catalog.get("bar-1").ok_or("bar-1 missing")?;
        let ivory = catalog.packaging_option("ivory").ok_or("ivory missing")?;

        let mut cart = Cart::new(catalog.currency());
        cart.add_with_packaging(NewCartItem::from_product(bar), NewCartItem::packaging_for(bar, ivory))?;

        let order = build_order(&cart, ShippingDetails::default(), PaymentMethod::Crypto);

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total(), dec!(1600));
        assert_eq!(order.payment, PaymentMethod::Crypto);
        assert!(order.has_goods());

        Ok(())
    }

    #[test]
    fn empty_cart_builds_order_without_goods() -> TestResult {
        let catalog = Catalog::bundled()?;
        let cart = Cart::new(catalog.currency());

        let order = build_order(&cart, ShippingDetails::default(), PaymentMethod::Card);

        assert!(!order.has_goods());

        Ok(())
    }

    #[test]
    fn refusals_read_naturally() {
        assert_eq!(
            checkout_message(&CheckoutError::EmptyOrder),
            "Your cart has no bullion yet."
        );
        assert_eq!(
            checkout_message(&CheckoutError::Rejected("limit exceeded".to_string())),
            "Order rejected: limit exceeded"
        );
    }

    #[test]
    fn shipping_fields_cover_validation() {
        let errors = ShippingDetails::default().validate().err().unwrap_or_default();

        assert_eq!(errors.len(), SHIPPING_FIELDS.len());
        assert!(errors.iter().all(|error| SHIPPING_FIELDS.contains(&error.field())));
    }
}
