//! Catalog
//!
//! The product catalog is authored as YAML and embedded at build time. It is
//! immutable for the lifetime of a session.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use tracing::debug;

use crate::{
    fixtures::{FixtureError, catalog::CatalogFixture},
    products::{CategoryFilter, Product, ProductKey, filter_by_category},
};

const BUNDLED_CATALOG_YAML: &str = include_str!("../fixtures/catalog.yml");

/// A complimentary packaging accessory offered alongside a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingOption {
    /// Unique packaging id
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Image reference
    pub image: String,
}

/// Product catalog
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product<'static>>,
    keys_by_id: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    packaging: Vec<PackagingOption>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load the catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the embedded fixture is invalid.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_yaml(BUNDLED_CATALOG_YAML)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when parsing fails, a price or category is
    /// invalid, products disagree on currency, ids repeat, or no products are
    /// present.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::try_from(fixture)
    }

    /// Look a product up by id.
    pub fn get(&self, id: &str) -> Option<&Product<'static>> {
        self.keys_by_id
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Products in fixture order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'static>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products passing the filter, in fixture order.
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Product<'static>> {
        filter_by_category(self.iter(), filter)
    }

    /// Complimentary packaging options.
    pub fn packaging(&self) -> &[PackagingOption] {
        &self.packaging
    }

    /// Look a packaging option up by id.
    pub fn packaging_option(&self, id: &str) -> Option<&PackagingOption> {
        self.packaging.iter().find(|option| option.id == id)
    }

    /// Catalog base currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let mut products = SlotMap::with_key();
        let mut keys_by_id = FxHashMap::default();
        let mut order = Vec::with_capacity(fixture.products.len());
        let mut currency: Option<&'static Currency> = None;

        for product_fixture in fixture.products {
            let product: Product<'static> = Product::try_from(product_fixture)?;
            let product_currency = product.price.currency();

            if let Some(existing) = currency
                && existing != product_currency
            {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            currency = Some(product_currency);

            if keys_by_id.contains_key(&product.id) {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            let id = product.id.clone();
            let key = products.insert(product);

            keys_by_id.insert(id, key);
            order.push(key);
        }

        let mut packaging: Vec<PackagingOption> = Vec::with_capacity(fixture.packaging.len());

        for option in fixture.packaging {
            if packaging.iter().any(|existing| existing.id == option.id) {
                return Err(FixtureError::DuplicatePackaging(option.id));
            }

            packaging.push(option.into());
        }

        let currency = currency.ok_or(FixtureError::NoProducts)?;

        debug!(
            products = order.len(),
            packaging = packaging.len(),
            currency = currency.iso_alpha_code,
            "catalog loaded"
        );

        Ok(Catalog {
            products,
            keys_by_id,
            order,
            packaging,
            currency,
        })
    }
}
