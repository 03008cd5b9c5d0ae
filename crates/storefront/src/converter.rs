use aurum::{
    converter::{TROY_OUNCE_IN_GRAMS, price_per_gram, value_of_grams_in},
    currency::{CurrencyStore, format_amount},
    feed::SpotPrice,
};
use leptos::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Quick-pick weights, as `(label, grams)`.
pub fn presets() -> [(&'static str, Decimal); 5] {
    [
        ("1 g", dec!(1)),
        ("1 oz", TROY_OUNCE_IN_GRAMS),
        ("50 g", dec!(50)),
        ("100 g", dec!(100)),
        ("1 kg", dec!(1000)),
    ]
}

/// Heaviest weight the converter accepts: one tonne.
pub const MAX_GRAMS: Decimal = dec!(1000000);

/// Parse user input as a non-negative gram weight up to [`MAX_GRAMS`].
///
/// A comma is accepted as the decimal separator.
pub fn parse_grams(input: &str) -> Option<Decimal> {
    let normalised = input.trim().replace(',', ".");

    if normalised.is_empty() {
        return None;
    }

    normalised
        .parse::<Decimal>()
        .ok()
        .filter(|grams| !grams.is_sign_negative() && *grams <= MAX_GRAMS)
}

/// Formatted converter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Price of one gram in the display currency.
    pub per_gram: String,

    /// Value of the entered weight in the display currency.
    pub total: String,
}

/// Summarise the value of `grams` at spot price `price_per_ounce`.
///
/// `None` when the value does not fit in a `Decimal`.
pub fn conversion_summary(
    currency: &CurrencyStore,
    price_per_ounce: Decimal,
    grams: Decimal,
) -> Option<ConversionSummary> {
    let total = value_of_grams_in(currency, price_per_ounce, grams)?;

    Some(ConversionSummary {
        per_gram: currency.format_price(price_per_gram(price_per_ounce)),
        total: format_amount(total, currency.currency()),
    })
}

/// Grams to currency converter at the current spot price.
#[component]
pub fn GramConverter(
    /// Latest spot price.
    spot: RwSignal<SpotPrice>,

    /// Display currency.
    currency: RwSignal<CurrencyStore>,
) -> impl IntoView {
    let input = RwSignal::new("31.1035".to_string());

    let summary = move || {
        let grams = input.with(|input| parse_grams(input));
        let price = spot.get().value;

        grams.and_then(|grams| currency.with(|currency| conversion_summary(currency, price, grams)))
    };

    view! {
        <section id="converter" class="converter">
            <header class="section-header">
                <p class="section-eyebrow">"Gram Converter"</p>
                <h2 class="section-title">"What is your gold worth?"</h2>
            </header>
            <label class="converter-field">
                <span>"Weight in grams"</span>
                <input
                    type="text"
                    inputmode="decimal"
                    prop:value=move || input.get()
                    on:input=move |event| input.set(event_target_value(&event))
                />
            </label>
            <div class="converter-presets">
                {presets()
                    .into_iter()
                    .map(|(label, grams)| {
                        view! {
                            <button
                                type="button"
                                class="converter-preset"
                                on:click=move |_| input.set(grams.normalize().to_string())
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            {move || match summary() {
                Some(summary) => view! {
                    <dl class="converter-result">
                        <dt>"Per gram"</dt>
                        <dd>{summary.per_gram}</dd>
                        <dt>"Total value"</dt>
                        <dd class="converter-total">{summary.total}</dd>
                    </dl>
                }
                .into_any(),
                None => view! { <p class="form-error">"Enter a weight between 0 and 1,000,000 grams."</p> }.into_any(),
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use aurum::currency::DisplayCurrency;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_plain_and_comma_decimals() {
        assert_eq!(parse_grams("12.5"), Some(dec!(12.5)));
        assert_eq!(parse_grams(" 12,5 "), Some(dec!(12.5)));
        assert_eq!(parse_grams("0"), Some(Decimal::ZERO));
    }

    #[test]
    fn rejects_blank_negative_and_garbage() {
        assert_eq!(parse_grams(""), None);
        assert_eq!(parse_grams("   "), None);
        assert_eq!(parse_grams("-3"), None);
        assert_eq!(parse_grams("ten"), None);
    }

    #[test]
    fn rejects_weights_above_one_tonne() {
        assert_eq!(parse_grams("1000000"), Some(MAX_GRAMS));
        assert_eq!(parse_grams("1000000.01"), None);
        assert_eq!(parse_grams("79228162514264337593543950335"), None);
        assert_eq!(parse_grams("1e27"), None);
    }

    #[test]
    fn one_ounce_is_worth_the_spot_price() -> TestResult {
        let summary = conversion_summary(&CurrencyStore::default(), dec!(2400), TROY_OUNCE_IN_GRAMS)
            .ok_or("overflow")?;

        assert_eq!(summary.total, "$2,400.00");
        assert_eq!(summary.per_gram, "$77.16");

        Ok(())
    }

    #[test]
    fn summary_converts_to_display_currency() -> TestResult {
        let currency = CurrencyStore::default().with_currency(DisplayCurrency::Eur);

        let summary = conversion_summary(&currency, dec!(2400), TROY_OUNCE_IN_GRAMS).ok_or("overflow")?;

        assert_eq!(summary.total, "€2,208.00");

        Ok(())
    }

    #[test]
    fn overflowing_value_has_no_summary() {
        let yen = CurrencyStore::default().with_currency(DisplayCurrency::Jpy);

        assert_eq!(conversion_summary(&yen, Decimal::MAX, MAX_GRAMS), None);
    }

    #[test]
    fn ounce_preset_matches_troy_ounce() {
        assert!(presets().iter().any(|(label, grams)| *label == "1 oz" && *grams == TROY_OUNCE_IN_GRAMS));
    }
}
