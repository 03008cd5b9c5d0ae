//! Category filtering over the bundled catalog.

use aurum::prelude::*;
use testresult::TestResult;

#[test]
fn all_filter_is_identity() -> TestResult {
    let catalog = Catalog::bundled()?;
    let products: Vec<Product<'static>> = catalog.iter().cloned().collect();

    let filtered = filter_by_category(&products, CategoryFilter::All);

    assert_eq!(filtered.len(), products.len());
    assert!(filtered.iter().zip(&products).all(|(a, b)| a.id == b.id));

    Ok(())
}

#[test]
fn category_filter_is_ordered_subset() -> TestResult {
    let catalog = Catalog::bundled()?;
    let products: Vec<Product<'static>> = catalog.iter().cloned().collect();

    for category in Category::ALL {
        let filtered = filter_by_category(&products, category.into());
        let expected: Vec<&str> = products
            .iter()
            .filter(|product| product.category == category)
            .map(|product| product.id.as_str())
            .collect();

        let ids: Vec<&str> = filtered.iter().map(|product| product.id.as_str()).collect();

        assert_eq!(ids, expected);
        assert!(!ids.is_empty(), "{category} has no products");
    }

    Ok(())
}

#[test]
fn tabs_parse_back_to_filters() -> TestResult {
    let catalog = Catalog::bundled()?;

    let total: usize = Category::ALL
        .into_iter()
        .map(|category| catalog.filter(category.label().parse::<CategoryFilter>().unwrap_or_default()).len())
        .sum();

    assert_eq!(total, catalog.len());
    assert_eq!(catalog.filter("ALL".parse()?).len(), catalog.len());

    Ok(())
}
