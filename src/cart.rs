//! Cart

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{catalog::PackagingOption, checkout::OrderLine, products::Product};

/// Id prefix given to complimentary packaging lines.
pub const BOX_ID_PREFIX: &str = "box-";

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Outcome of a direct quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated(u32),

    /// The quantity dropped to zero or below and the line was removed.
    Removed,

    /// No line has the requested id.
    Missing,
}

/// Item about to be added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem<'a> {
    /// Product (or packaging) id
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price; zero for complimentary items
    pub price: Money<'a, Currency>,

    /// Display weight
    pub weight: String,

    /// Metal
    pub metal: String,

    /// Fineness
    pub purity: String,

    /// Image reference
    pub image: Option<String>,

    /// Complimentary packaging accessory
    pub is_box: bool,
}

impl<'a> NewCartItem<'a> {
    /// Cart item for a catalog product.
    pub fn from_product(product: &Product<'a>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            weight: product.weight.clone(),
            metal: product.metal.clone(),
            purity: product.purity.clone(),
            image: product.image().map(str::to_owned),
            is_box: false,
        }
    }

    /// Free packaging line that accompanies `product`.
    ///
    /// The line id is derived from the product id so each product carries at
    /// most one box line.
    pub fn packaging_for(product: &Product<'a>, option: &PackagingOption) -> Self {
        Self {
            id: format!("{BOX_ID_PREFIX}{}", product.id),
            name: option.name.clone(),
            price: Money::from_minor(0, product.price.currency()),
            weight: String::new(),
            metal: String::new(),
            purity: String::new(),
            image: (!option.image.is_empty()).then(|| option.image.clone()),
            is_box: true,
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    /// Product (or packaging) id
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Display weight
    pub weight: String,

    /// Metal
    pub metal: String,

    /// Fineness
    pub purity: String,

    /// Image reference
    pub image: Option<String>,

    /// Complimentary packaging accessory
    pub is_box: bool,

    quantity: u32,
}

impl<'a> CartItem<'a> {
    fn new(item: NewCartItem<'a>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            weight: item.weight,
            metal: item.metal,
            purity: item.purity,
            image: item.image,
            is_box: item.is_box,
            quantity: 1,
        }
    }

    /// Number of units; always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> Decimal {
        *self.price.amount() * Decimal::from(self.quantity)
    }
}

/// Shopping cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
    is_open: bool,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
            is_open: false,
        }
    }

    /// Add one unit of `item`, returning the line's new quantity.
    ///
    /// If a line with the same id exists its quantity is incremented and the
    /// existing display fields are kept: the first write wins, later calls
    /// with a different name or price for the same id do not overwrite it.
    /// Otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is priced in a
    /// different currency from the cart.
    pub fn add_item(&mut self, item: NewCartItem<'a>) -> Result<u32, CartError> {
        let item_currency = item.price.currency();

        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);

            debug!(id = %existing.id, quantity = existing.quantity, "cart item incremented");

            return Ok(existing.quantity);
        }

        debug!(id = %item.id, "cart item added");

        self.items.push(CartItem::new(item));

        Ok(1)
    }

    /// Add a product together with its complimentary packaging line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if either item is priced in a
    /// different currency from the cart. Nothing is added in that case.
    pub fn add_with_packaging(
        &mut self,
        product: NewCartItem<'a>,
        packaging: NewCartItem<'a>,
    ) -> Result<(), CartError> {
        for item in [&product, &packaging] {
            let item_currency = item.price.currency();

            if item_currency != self.currency {
                return Err(CartError::CurrencyMismatch(
                    item.id.clone(),
                    item_currency.iso_alpha_code,
                    self.currency.iso_alpha_code,
                ));
            }
        }

        self.add_item(product)?;
        self.add_item(packaging)?;

        Ok(())
    }

    /// Set a line's quantity directly. Zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> QuantityChange {
        let Some(index) = self.position(id) else {
            return QuantityChange::Missing;
        };

        if quantity <= 0 {
            self.items.remove(index);
            debug!(id, "cart item removed by quantity update");

            return QuantityChange::Removed;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.items.get_mut(index) {
            Some(line) => {
                line.quantity = quantity;
                QuantityChange::Updated(quantity)
            }
            None => QuantityChange::Missing,
        }
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, id: &str) -> QuantityChange {
        match self.get(id) {
            Some(line) => self.update_quantity(id, i64::from(line.quantity) + 1),
            None => QuantityChange::Missing,
        }
    }

    /// Take one unit off an existing line, removing it at zero.
    pub fn decrement(&mut self, id: &str) -> QuantityChange {
        match self.get(id) {
            Some(line) => self.update_quantity(id, i64::from(line.quantity) - 1),
            None => QuantityChange::Missing,
        }
    }

    /// Remove a line regardless of quantity.
    pub fn remove_item(&mut self, id: &str) -> Option<CartItem<'a>> {
        let index = self.position(id)?;

        Some(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look a line up by id.
    pub fn get(&self, id: &str) -> Option<&CartItem<'a>> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Units of purchasable goods; packaging lines are not counted.
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .filter(|line| !line.is_box)
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over every line.
    pub fn total_price(&self) -> Money<'a, Currency> {
        let total = self
            .items
            .iter()
            .fold(Decimal::ZERO, |total, line| total + line.line_total());

        Money::from_decimal(total, self.currency)
    }

    /// Number of lines, packaging included.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Whether the cart drawer is showing.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show the cart drawer.
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the cart drawer.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Flip the cart drawer.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Order lines for checkout.
    pub fn snapshot(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|line| OrderLine {
                id: line.id.clone(),
                name: line.name.clone(),
                unit_price: *line.price.amount(),
                quantity: line.quantity,
                is_box: line.is_box,
            })
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|line| line.id == id)
    }
}
