//! Checkout

use std::{fmt, str::FromStr};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    reference,
    validation::{Field, ValidationErrors},
};

/// Prefix for order references.
pub const ORDER_REFERENCE_PREFIX: &str = "ORD";

/// Errors raised when placing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The order has no purchasable lines.
    #[error("Cannot place an order for an empty cart")]
    EmptyOrder,

    /// Shipping details failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The payment method is not recognised.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// The order service refused the order.
    #[error("Order rejected: {0}")]
    Rejected(String),
}

/// One line of an order, priced in the catalog base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Product (or packaging) id
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub unit_price: Decimal,

    /// Units ordered
    pub quantity: u32,

    /// Complimentary packaging accessory
    pub is_box: bool,
}

impl OrderLine {
    /// `unit_price * quantity`.
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PaymentMethod {
    /// Credit or debit card
    #[default]
    Card,

    /// Bank wire
    BankTransfer,

    /// Cryptocurrency
    Crypto,
}

impl PaymentMethod {
    /// Every method, in form order.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::Crypto,
    ];

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Crypto => "Crypto",
        }
    }

    /// Stable form value.
    pub fn key(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank-transfer",
            PaymentMethod::Crypto => "crypto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CheckoutError::UnknownPaymentMethod(s.to_string()))
    }
}

/// Where the order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    /// Recipient name
    pub full_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Country
    pub country: String,
}

impl ShippingDetails {
    /// Check every required field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require(Field::Name, &self.full_name);
        errors.require_email(&self.email);
        errors.require(Field::Phone, &self.phone);
        errors.require(Field::Address, &self.address);
        errors.require(Field::City, &self.city);
        errors.require(Field::Country, &self.country);

        errors.into_result()
    }
}

/// Order submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Cart lines
    pub lines: Vec<OrderLine>,

    /// Delivery details
    pub shipping: ShippingDetails,

    /// Payment method
    pub payment: PaymentMethod,
}

impl OrderRequest {
    /// Sum of every line total.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |total, line| total + line.total())
    }

    /// Whether the order contains anything other than packaging.
    pub fn has_goods(&self) -> bool {
        self.lines.iter().any(|line| !line.is_box && line.quantity > 0)
    }
}

/// Acknowledgement for a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Reference quoted back to the shopper
    pub reference: String,

    /// Order total in the catalog base currency
    pub total: Decimal,
}

/// Accepts orders.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait CheckoutService {
    /// Validate and place an order.
    async fn place_order(&self, order: OrderRequest) -> Result<OrderConfirmation, CheckoutError>;
}

/// Checkout that confirms every valid order without charging anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedCheckout;

#[async_trait(?Send)]
impl CheckoutService for SimulatedCheckout {
    async fn place_order(&self, order: OrderRequest) -> Result<OrderConfirmation, CheckoutError> {
        if !order.has_goods() {
            return Err(CheckoutError::EmptyOrder);
        }

        order.shipping.validate()?;

        let reference = reference::generate(ORDER_REFERENCE_PREFIX, &mut rand::thread_rng());
        let total = order.total();

        info!(
            %reference,
            %total,
            lines = order.lines.len(),
            payment = order.payment.key(),
            "order placed"
        );

        Ok(OrderConfirmation { reference, total })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Omar Nasser".to_string(),
            email: "omar@example.com".to_string(),
            phone: "+971 4 000 0000".to_string(),
            address: "Gold Souk, Deira".to_string(),
            city: "Dubai".to_string(),
            country: "UAE".to_string(),
        }
    }

    fn line(id: &str, unit_price: Decimal, quantity: u32, is_box: bool) -> OrderLine {
        OrderLine {
            id: id.to_string(),
            name: id.to_string(),
            unit_price,
            quantity,
            is_box,
        }
    }

    fn order(lines: Vec<OrderLine>) -> OrderRequest {
        OrderRequest {
            lines,
            shipping: shipping(),
            payment: PaymentMethod::BankTransfer,
        }
    }

    #[tokio::test]
    async fn confirms_valid_order_with_total() -> TestResult {
        let request = order(vec![
            line("bar-1", dec!(1600), 2, false),
            line("box-bar-1", Decimal::ZERO, 1, true),
        ]);

        let confirmation = SimulatedCheckout.place_order(request).await?;

        assert_eq!(confirmation.total, dec!(3200));
        assert!(confirmation.reference.starts_with("ORD-"));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_empty_order() {
        let result = SimulatedCheckout.place_order(order(Vec::new())).await;

        assert_eq!(result, Err(CheckoutError::EmptyOrder));
    }

    #[tokio::test]
    async fn packaging_alone_is_an_empty_order() {
        let request = order(vec![line("box-bar-1", Decimal::ZERO, 1, true)]);

        let result = SimulatedCheckout.place_order(request).await;

        assert_eq!(result, Err(CheckoutError::EmptyOrder));
    }

    #[tokio::test]
    async fn rejects_incomplete_shipping() {
        let mut request = order(vec![line("coin-1", dec!(2480), 1, false)]);
        request.shipping.city = String::new();

        let result = SimulatedCheckout.place_order(request).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Invalid(errors)) if errors.for_field(Field::City).is_some()
        ));
    }

    #[test]
    fn blank_shipping_reports_every_field() {
        let errors = ShippingDetails::default()
            .validate()
            .err()
            .unwrap_or_default();

        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn parses_payment_methods() -> TestResult {
        assert_eq!("bank-transfer".parse::<PaymentMethod>()?, PaymentMethod::BankTransfer);
        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(CheckoutError::UnknownPaymentMethod("cheque".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn mocked_service_passes_order_through() -> TestResult {
        let mut service = MockCheckoutService::new();

        service
            .expect_place_order()
            .withf(|order| order.payment == PaymentMethod::Crypto)
            .returning(|order| {
                Ok(OrderConfirmation {
                    reference: "ORD-TEST".to_string(),
                    total: order.total(),
                })
            });

        let mut request = order(vec![line("silver-1", dec!(38.50), 4, false)]);
        request.payment = PaymentMethod::Crypto;

        let confirmation = service.place_order(request).await?;

        assert_eq!(confirmation.total, dec!(154));

        Ok(())
    }
}
