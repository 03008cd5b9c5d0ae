//! Products

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Label used for the "show everything" category filter.
pub const ALL_CATEGORIES_LABEL: &str = "ALL";

/// Errors raised when parsing a category label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// The label does not name a known category.
    #[error("Unknown category: {0}")]
    Unknown(String),
}

/// Catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
    /// Minted and cast gold bars.
    #[serde(rename = "GOLD BARS")]
    GoldBars,

    /// Silver bars.
    #[serde(rename = "SILVER BARS")]
    SilverBars,

    /// Gold bullion coins.
    #[serde(rename = "GOLDEN COINS")]
    GoldenCoins,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [
        Category::GoldBars,
        Category::SilverBars,
        Category::GoldenCoins,
    ];

    /// Display label, as used in fixtures and category tabs.
    pub fn label(self) -> &'static str {
        match self {
            Category::GoldBars => "GOLD BARS",
            Category::SilverBars => "SILVER BARS",
            Category::GoldenCoins => "GOLDEN COINS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| CategoryError::Unknown(label.to_string()))
    }
}

/// Category filter applied to product grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,

    /// Products of a single category.
    Only(Category),
}

impl CategoryFilter {
    /// Every filter, in tab order.
    pub fn tabs() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(CategoryFilter::All).chain(Category::ALL.map(CategoryFilter::Only))
    }

    /// Display label for the filter tab.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES_LABEL,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Whether the given category passes this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) {
            return Ok(CategoryFilter::All);
        }

        s.parse().map(CategoryFilter::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Unique product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Marketing description
    pub description: String,

    /// Catalog category
    pub category: Category,

    /// Metal, e.g. "Gold"
    pub metal: String,

    /// Display weight, e.g. "1 oz" or "100 g"
    pub weight: String,

    /// Fineness, e.g. "999.9"
    pub purity: String,

    /// Price in the catalog base currency
    pub price: Money<'a, Currency>,

    /// Ordered image references; the first one is the primary image
    pub images: SmallVec<[String; 4]>,

    /// Whether the product can currently be ordered
    pub in_stock: bool,
}

impl Product<'_> {
    /// Primary image reference, if the product has any.
    pub fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Narrow a product list to a category, preserving order.
///
/// Accepts a slice or any iterator of borrowed products; the source is never
/// modified. [`CategoryFilter::All`] returns every product.
pub fn filter_by_category<'p, 'a: 'p>(
    products: impl IntoIterator<Item = &'p Product<'a>>,
    filter: CategoryFilter,
) -> Vec<&'p Product<'a>> {
    products
        .into_iter()
        .filter(|product| filter.matches(product.category))
        .collect()
}
