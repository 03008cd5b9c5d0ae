//! Gram converter
//!
//! Spot prices are quoted per troy ounce in the base currency. Weights come
//! straight from user input, so every product is checked and an overflow
//! yields `None` instead of a panic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::currency::CurrencyStore;

/// Grams in one troy ounce.
pub const TROY_OUNCE_IN_GRAMS: Decimal = dec!(31.1035);

/// Price of one gram given a per-ounce price.
///
/// Dividing by a constant above one only shrinks the magnitude, so this
/// cannot overflow.
pub fn price_per_gram(price_per_ounce: Decimal) -> Decimal {
    price_per_ounce
        .checked_div(TROY_OUNCE_IN_GRAMS)
        .unwrap_or(Decimal::ZERO)
}

/// Base-currency value of `grams` at `price_per_ounce`, or `None` when the
/// product does not fit in a `Decimal`.
pub fn value_of_grams(price_per_ounce: Decimal, grams: Decimal) -> Option<Decimal> {
    grams.checked_mul(price_per_gram(price_per_ounce))
}

/// Value of `grams` in the store's display currency.
pub fn value_of_grams_in(
    store: &CurrencyStore,
    price_per_ounce: Decimal,
    grams: Decimal,
) -> Option<Decimal> {
    value_of_grams(price_per_ounce, grams).and_then(|value| store.checked_convert_price(value))
}

/// Troy ounces to grams.
pub fn ounces_to_grams(ounces: Decimal) -> Option<Decimal> {
    ounces.checked_mul(TROY_OUNCE_IN_GRAMS)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::currency::DisplayCurrency;

    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal) {
        let tolerance = expected.abs() * dec!(0.000000001);

        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} is not within 1e-9 of {expected}"
        );
    }

    #[test]
    fn one_ounce_of_grams_is_the_ounce_price() -> TestResult {
        let value = value_of_grams(dec!(2400), TROY_OUNCE_IN_GRAMS).ok_or("overflow")?;

        assert_close(value, dec!(2400));

        Ok(())
    }

    #[test]
    fn value_matches_formula() -> TestResult {
        let price = dec!(2345.67);
        let grams = dec!(50);

        let value = value_of_grams(price, grams).ok_or("overflow")?;

        assert_close(value, grams * price / dec!(31.1035));

        Ok(())
    }

    #[test]
    fn zero_grams_is_worth_nothing() {
        assert_eq!(value_of_grams(dec!(2400), Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn display_currency_scales_value() -> TestResult {
        let store = CurrencyStore::default().with_currency(DisplayCurrency::Aed);

        let usd = value_of_grams(dec!(2400), dec!(10)).ok_or("overflow")?;
        let aed = value_of_grams_in(&store, dec!(2400), dec!(10)).ok_or("overflow")?;

        assert_close(aed, usd * dec!(3.6725));

        Ok(())
    }

    #[test]
    fn ounces_convert_to_grams() {
        assert_eq!(ounces_to_grams(dec!(2)), Some(dec!(62.2070)));
    }

    #[test]
    fn oversized_weights_do_not_overflow() -> TestResult {
        let grams: Decimal = "79228162514264337593543950335".parse()?;
        let octillion: Decimal = "1000000000000000000000000000".parse()?;
        let yen = CurrencyStore::default().with_currency(DisplayCurrency::Jpy);

        assert_eq!(value_of_grams(dec!(2400), grams), None);
        assert_eq!(value_of_grams_in(&yen, dec!(2400), octillion), None);
        assert_eq!(ounces_to_grams(Decimal::MAX), None);

        Ok(())
    }

    #[test]
    fn extreme_ounce_price_still_divides() {
        assert!(price_per_gram(Decimal::MAX) < Decimal::MAX);
        assert!(price_per_gram(Decimal::MIN) > Decimal::MIN);
    }
}
