//! Catalog Fixtures

use rusty_money::Money;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    catalog::PackagingOption,
    fixtures::{FixtureError, parse_price},
    products::{Category, Product},
};

/// Wrapper for the catalog YAML document
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products, in display order
    pub products: Vec<ProductFixture>,

    /// Complimentary packaging options
    #[serde(default)]
    pub packaging: Vec<PackagingFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Unique product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Marketing copy
    #[serde(default)]
    pub description: String,

    /// Category label (e.g., "GOLD BARS")
    pub category: String,

    /// Metal
    pub metal: String,

    /// Display weight
    pub weight: String,

    /// Fineness
    pub purity: String,

    /// Product price (e.g., "1600.00 USD")
    pub price: String,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Stock flag, defaults to in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

/// Packaging Fixture
#[derive(Debug, Deserialize)]
pub struct PackagingFixture {
    /// Unique packaging id
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Image reference
    #[serde(default)]
    pub image: String,
}

fn in_stock_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let category: Category = fixture.category.parse()?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            category,
            metal: fixture.metal,
            weight: fixture.weight,
            purity: fixture.purity,
            price: Money::from_minor(minor_units, currency),
            images: SmallVec::from_vec(fixture.images),
            in_stock: fixture.in_stock,
        })
    }
}

impl From<PackagingFixture> for PackagingOption {
    fn from(fixture: PackagingFixture) -> Self {
        PackagingOption {
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            image: fixture.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn fixture(category: &str, price: &str) -> ProductFixture {
        ProductFixture {
            id: "bar-1".to_string(),
            name: "Fine Gold Bar".to_string(),
            description: String::new(),
            category: category.to_string(),
            metal: "Gold".to_string(),
            weight: "50 g".to_string(),
            purity: "999.9".to_string(),
            price: price.to_string(),
            images: vec!["bar-1.webp".to_string(), "bar-1-back.webp".to_string()],
            in_stock: true,
        }
    }

    #[test]
    fn converts_product_fixture() -> TestResult {
        let product = Product::try_from(fixture("GOLD BARS", "1600.00 USD"))?;

        assert_eq!(product.category, Category::GoldBars);
        assert_eq!(product.price, Money::from_minor(160_000, iso::USD));
        assert_eq!(product.image(), Some("bar-1.webp"));

        Ok(())
    }

    #[test]
    fn rejects_unknown_category() {
        let result = Product::try_from(fixture("PLATINUM BARS", "1600.00 USD"));

        assert!(matches!(result, Err(FixtureError::Category(_))));
    }

    #[test]
    fn in_stock_defaults_to_true() -> TestResult {
        let yaml = r#"
id: coin-1
name: "Britannia"
category: "GOLDEN COINS"
metal: Gold
weight: "1 oz"
purity: "999.9"
price: "2450.00 USD"
"#;

        let fixture: ProductFixture = serde_norway::from_str(yaml)?;

        assert!(fixture.in_stock);
        assert!(fixture.images.is_empty());

        Ok(())
    }
}
