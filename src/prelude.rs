//! Aurum prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartItem, NewCartItem, QuantityChange},
    catalog::{Catalog, PackagingOption},
    checkout::{
        CheckoutError, CheckoutService, OrderConfirmation, OrderLine, OrderRequest, PaymentMethod,
        ShippingDetails, SimulatedCheckout,
    },
    converter::{TROY_OUNCE_IN_GRAMS, ounces_to_grams, price_per_gram, value_of_grams, value_of_grams_in},
    currency::{CurrencyError, CurrencyStore, DisplayCurrency, ExchangeRates, format_amount},
    feed::{
        FeedError, HttpSpotPriceSource, MarketSimulator, PriceOrigin, SpotFeed, SpotPrice,
        SpotPriceCell, SpotPriceSource,
    },
    fixtures::FixtureError,
    inquiries::{Inquiry, InquiryDesk, InquiryError, InquiryKind, InquiryReceipt, SimulatedInquiryDesk},
    modal::{ModalKind, ModalStack},
    products::{Category, CategoryFilter, Product, ProductKey, filter_by_category},
    sparkline::{PriceHistory, Point, area_path, fit_points, smooth_path},
    validation::{Field, FieldError, ValidationErrors},
};
