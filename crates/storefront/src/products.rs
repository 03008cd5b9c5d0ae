use std::sync::Arc;

use aurum::{
    catalog::Catalog,
    currency::CurrencyStore,
    modal::ModalKind,
    products::{CategoryFilter, Product},
};
use leptos::prelude::*;
use tracing::debug;

use crate::Stores;

/// UI model for a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    /// Product id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Category label.
    pub category: &'static str,

    /// Weight and fineness, e.g. "50 g · 999.9".
    pub detail_line: String,

    /// Price in the display currency.
    pub price: String,

    /// Primary image reference.
    pub image: Option<String>,

    /// Whether the product can be ordered.
    pub in_stock: bool,
}

impl ProductCardView {
    fn from_product(product: &Product<'_>, currency: &CurrencyStore) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.label(),
            detail_line: format!("{} · {}", product.weight, product.purity),
            price: currency.format_money(&product.price),
            image: product.image().map(str::to_owned),
            in_stock: product.in_stock,
        }
    }
}

/// Cards for the products passing `filter`, in catalog order.
pub fn product_cards(
    catalog: &Catalog,
    filter: CategoryFilter,
    currency: &CurrencyStore,
) -> Vec<ProductCardView> {
    catalog
        .filter(filter)
        .into_iter()
        .map(|product| ProductCardView::from_product(product, currency))
        .collect()
}

#[component]
fn CategoryTabs(filter: RwSignal<CategoryFilter>) -> impl IntoView {
    view! {
        <div class="category-tabs" role="tablist" aria-label="Product categories">
            {CategoryFilter::tabs()
                .map(|tab| {
                    view! {
                        <button
                            type="button"
                            role="tab"
                            class="category-tab"
                            class:category-tab-active=move || filter.get() == tab
                            aria-selected=move || (filter.get() == tab).to_string()
                            on:click=move |_| {
                                debug!(filter = %tab, "category selected");
                                filter.set(tab);
                            }
                        >
                            {tab.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn ProductCard(card: ProductCardView, stores: Stores) -> impl IntoView {
    let product_id = card.id.clone();
    let open_detail = move |_| {
        stores.selected.set(Some(product_id.clone()));
        stores.open_modal(ModalKind::ProductDetail);
    };

    view! {
        <li class="product-card" class:product-card-sold-out=!card.in_stock>
            <button
                type="button"
                class="product-card-button"
                aria-label=format!("View {}", card.name)
                on:click=open_detail
            >
                {card.image.clone().map(|src| view! { <img class="product-card-image" src=src alt="" loading="lazy" /> })}
                <p class="product-card-category">{card.category}</p>
                <h3 class="product-card-name">{card.name.clone()}</h3>
                <p class="product-card-detail">{card.detail_line.clone()}</p>
                <p class="product-card-price">{card.price.clone()}</p>
                {(!card.in_stock).then(|| view! { <span class="product-card-badge">"Sold out"</span> })}
            </button>
        </li>
    }
}

/// Filterable product grid.
#[component]
pub fn ProductSection(
    /// Shared catalog.
    catalog: Arc<Catalog>,

    /// Shared stores.
    stores: Stores,
) -> impl IntoView {
    let filter = RwSignal::new(CategoryFilter::default());

    let cards = move || {
        let cards = stores
            .currency
            .with(|currency| product_cards(&catalog, filter.get(), currency));

        if cards.is_empty() {
            return view! { <p class="product-grid-empty">"Nothing in this category yet."</p> }.into_any();
        }

        view! {
            <ul class="product-grid">
                {cards
                    .into_iter()
                    .map(|card| view! { <ProductCard card=card stores=stores /> })
                    .collect_view()}
            </ul>
        }
        .into_any()
    };

    view! {
        <section id="collection" class="collection">
            <header class="section-header">
                <p class="section-eyebrow">"The Collection"</p>
                <h2 class="section-title">"Bars and coins"</h2>
            </header>
            <CategoryTabs filter=filter />
            {cards}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use aurum::{currency::DisplayCurrency, products::Category};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn all_filter_lists_every_product_in_order() -> TestResult {
        let catalog = Catalog::bundled()?;

        let ids: Vec<_> = product_cards(&catalog, CategoryFilter::All, &CurrencyStore::default())
            .into_iter()
            .map(|card| card.id)
            .collect();

        assert_eq!(
            ids,
            ["bar-1", "bar-2", "bar-3", "silver-1", "silver-2", "coin-1", "coin-2"]
        );

        Ok(())
    }

    #[test]
    fn category_filter_narrows_cards() -> TestResult {
        let catalog = Catalog::bundled()?;

        let cards = product_cards(
            &catalog,
            CategoryFilter::Only(Category::SilverBars),
            &CurrencyStore::default(),
        );

        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|card| card.category == "SILVER BARS"));

        Ok(())
    }

    #[test]
    fn card_prices_follow_display_currency() -> TestResult {
        let catalog = Catalog::bundled()?;
        let currency = CurrencyStore::default().with_currency(DisplayCurrency::Eur);

        let cards = product_cards(&catalog, CategoryFilter::All, &currency);
        let bar = cards.first().ok_or("missing first card")?;

        assert_eq!(bar.price, "€1,472.00");
        assert_eq!(bar.detail_line, "50 g · 999.9");

        Ok(())
    }

    #[test]
    fn sold_out_products_are_flagged() -> TestResult {
        let catalog = Catalog::bundled()?;

        let cards = product_cards(&catalog, CategoryFilter::All, &CurrencyStore::default());
        let kilobar = cards
            .iter()
            .find(|card| card.id == "bar-3")
            .ok_or("missing kilobar")?;

        assert!(!kilobar.in_stock);

        Ok(())
    }
}
