//! Aurum
//!
//! Aurum is the domain core of a precious-metals storefront: the product catalog, display
//! currencies, the cart, the modal stack, a gram converter, the spot-price feed and the lead and
//! checkout forms. It has no UI of its own; the storefront crate injects these stores into its
//! components.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod converter;
pub mod currency;
pub mod feed;
pub mod fixtures;
pub mod inquiries;
pub mod modal;
pub mod prelude;
pub mod products;
pub mod reference;
pub mod sparkline;
pub mod validation;
