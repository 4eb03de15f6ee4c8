//! Currency registry and the override seam for external sources.

use crate::core::error::{PricingError, Result, ensure_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Code of the currency every configured amount is expressed in.
pub const BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub symbol: String,
    /// BCP 47 tag such as `nb-NO`, selects separators and symbol placement.
    pub locale: String,
    /// Units of this currency per unit of the base currency.
    pub conversion_rate: Decimal,
    /// Largest revenue a calculator offers in this currency.
    pub max_revenue: Decimal,
}

/// A partial currency entry supplied by an external source.
///
/// For a code already in the registry only the given fields are replaced. A
/// new code must provide every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOverride {
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub conversion_rate: Option<Decimal>,
    #[serde(default)]
    pub max_revenue: Option<Decimal>,
}

/// Source of currency overrides, e.g. a config file or a database table.
pub trait CurrencyOverrideProvider: Send + Sync {
    fn currency_overrides(&self) -> anyhow::Result<Vec<CurrencyOverride>>;
}

/// Read-only table of currencies keyed by code, with exactly one base entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyRegistry {
    base: String,
    currencies: BTreeMap<String, CurrencyConfig>,
}

fn entry(
    code: &str,
    symbol: &str,
    locale: &str,
    rate: Decimal,
    max_revenue: i64,
) -> CurrencyConfig {
    CurrencyConfig {
        code: code.to_string(),
        symbol: symbol.to_string(),
        locale: locale.to_string(),
        conversion_rate: rate,
        max_revenue: Decimal::from(max_revenue),
    }
}

impl CurrencyRegistry {
    /// The built-in table.
    pub fn standard() -> Self {
        let currencies = [
            entry("USD", "$", "en-US", Decimal::ONE, 50_000_000),
            entry("EUR", "€", "de-DE", Decimal::new(92, 2), 46_000_000),
            entry("GBP", "£", "en-GB", Decimal::new(79, 2), 40_000_000),
            entry("NOK", "kr", "nb-NO", Decimal::new(115, 1), 575_000_000),
            entry("SEK", "kr", "sv-SE", Decimal::from(11), 550_000_000),
            entry("DKK", "kr.", "da-DK", Decimal::new(69, 1), 345_000_000),
        ]
        .into_iter()
        .map(|c| (c.code.clone(), c))
        .collect();

        Self {
            base: BASE_CURRENCY.to_string(),
            currencies,
        }
    }

    pub fn base(&self) -> &CurrencyConfig {
        // The base entry is inserted at construction and can never be removed.
        &self.currencies[&self.base]
    }

    pub fn contains(&self, code: &str) -> bool {
        self.currencies.contains_key(&code.to_ascii_uppercase())
    }

    /// Looks up `code`, falling back to the base currency for unknown codes.
    pub fn get(&self, code: &str) -> &CurrencyConfig {
        match self.currencies.get(&code.to_ascii_uppercase()) {
            Some(currency) => currency,
            None => {
                debug!("Unknown currency {code}, falling back to {}", self.base);
                self.base()
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyConfig> {
        self.currencies.values()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Caps `amount` at the display cap of `code`.
    pub fn clamp_revenue(&self, amount: Decimal, code: &str) -> Decimal {
        amount.min(self.get(code).max_revenue)
    }

    /// Returns a new registry with `overrides` applied in order.
    pub fn with_overrides(&self, overrides: &[CurrencyOverride]) -> Result<Self> {
        let mut currencies = self.currencies.clone();

        for ov in overrides {
            let code = ov.code.to_ascii_uppercase();

            if let Some(rate) = ov.conversion_rate {
                if rate <= Decimal::ZERO {
                    return Err(PricingError::InvalidConversionRate { code, rate });
                }
                if code == self.base && rate != Decimal::ONE {
                    return Err(PricingError::BaseRateOverride { code });
                }
            }
            if let Some(max_revenue) = ov.max_revenue {
                ensure_amount("max_revenue", max_revenue)?;
            }

            let merged = match currencies.get(&code) {
                Some(existing) => CurrencyConfig {
                    code: code.clone(),
                    symbol: ov.symbol.clone().unwrap_or_else(|| existing.symbol.clone()),
                    locale: ov.locale.clone().unwrap_or_else(|| existing.locale.clone()),
                    conversion_rate: ov.conversion_rate.unwrap_or(existing.conversion_rate),
                    max_revenue: ov.max_revenue.unwrap_or(existing.max_revenue),
                },
                None => CurrencyConfig {
                    symbol: required(&code, "symbol", ov.symbol.clone())?,
                    locale: required(&code, "locale", ov.locale.clone())?,
                    conversion_rate: required(&code, "conversion_rate", ov.conversion_rate)?,
                    max_revenue: required(&code, "max_revenue", ov.max_revenue)?,
                    code: code.clone(),
                },
            };
            debug!("Applied currency override for {code}");
            currencies.insert(code, merged);
        }

        Ok(Self {
            base: self.base.clone(),
            currencies,
        })
    }

    /// Applies the overrides offered by `provider`.
    pub fn with_overrides_from(
        &self,
        provider: &dyn CurrencyOverrideProvider,
    ) -> anyhow::Result<Self> {
        let overrides = provider.currency_overrides()?;
        Ok(self.with_overrides(&overrides)?)
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn required<T>(code: &str, field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| PricingError::IncompleteCurrency {
        code: code.to_string(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_registry_has_single_base() {
        let registry = CurrencyRegistry::standard();
        assert_eq!(registry.base().code, BASE_CURRENCY);
        assert_eq!(registry.base().conversion_rate, Decimal::ONE);
        assert_eq!(
            registry
                .iter()
                .filter(|c| c.conversion_rate == Decimal::ONE)
                .count(),
            1
        );
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get("NOK").conversion_rate, d("11.5"));
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_falls_back() {
        let registry = CurrencyRegistry::standard();
        assert_eq!(registry.get("nok").code, "NOK");
        assert!(registry.contains("eur"));
        assert!(!registry.contains("JPY"));
        assert_eq!(registry.get("JPY").code, "USD");
        assert_eq!(registry.get("").code, "USD");
    }

    #[test]
    fn test_clamp_revenue() {
        let registry = CurrencyRegistry::standard();
        assert_eq!(registry.clamp_revenue(d("1000"), "USD"), d("1000"));
        assert_eq!(
            registry.clamp_revenue(d("900000000"), "NOK"),
            d("575000000")
        );
    }

    #[test]
    fn test_override_existing_currency() {
        let registry = CurrencyRegistry::standard();
        let updated = registry
            .with_overrides(&[CurrencyOverride {
                code: "nok".to_string(),
                conversion_rate: Some(d("11.2")),
                ..Default::default()
            }])
            .unwrap();

        let nok = updated.get("NOK");
        assert_eq!(nok.conversion_rate, d("11.2"));
        assert_eq!(nok.symbol, "kr");
        assert_eq!(nok.locale, "nb-NO");
        // The source registry is untouched.
        assert_eq!(registry.get("NOK").conversion_rate, d("11.5"));
    }

    #[test]
    fn test_override_adds_new_currency() {
        let updated = CurrencyRegistry::standard()
            .with_overrides(&[CurrencyOverride {
                code: "CHF".to_string(),
                symbol: Some("CHF".to_string()),
                locale: Some("de-CH".to_string()),
                conversion_rate: Some(d("0.88")),
                max_revenue: Some(d("44000000")),
            }])
            .unwrap();
        assert!(updated.contains("CHF"));
        assert_eq!(updated.len(), 7);
    }

    #[test]
    fn test_invalid_overrides() {
        let registry = CurrencyRegistry::standard();

        let incomplete = registry.with_overrides(&[CurrencyOverride {
            code: "CHF".to_string(),
            conversion_rate: Some(d("0.88")),
            ..Default::default()
        }]);
        assert_eq!(
            incomplete,
            Err(PricingError::IncompleteCurrency {
                code: "CHF".to_string(),
                field: "symbol"
            })
        );

        let zero_rate = registry.with_overrides(&[CurrencyOverride {
            code: "EUR".to_string(),
            conversion_rate: Some(Decimal::ZERO),
            ..Default::default()
        }]);
        assert!(matches!(
            zero_rate,
            Err(PricingError::InvalidConversionRate { .. })
        ));

        let base_rate = registry.with_overrides(&[CurrencyOverride {
            code: "USD".to_string(),
            conversion_rate: Some(d("1.1")),
            ..Default::default()
        }]);
        assert_eq!(
            base_rate,
            Err(PricingError::BaseRateOverride {
                code: "USD".to_string()
            })
        );
    }

    struct StaticOverrides(Vec<CurrencyOverride>);

    impl CurrencyOverrideProvider for StaticOverrides {
        fn currency_overrides(&self) -> anyhow::Result<Vec<CurrencyOverride>> {
            Ok(self.0.clone())
        }
    }

    struct FailingOverrides;

    impl CurrencyOverrideProvider for FailingOverrides {
        fn currency_overrides(&self) -> anyhow::Result<Vec<CurrencyOverride>> {
            Err(anyhow::anyhow!("override store unavailable"))
        }
    }

    #[test]
    fn test_overrides_from_provider() {
        let provider = StaticOverrides(vec![CurrencyOverride {
            code: "GBP".to_string(),
            max_revenue: Some(d("10000000")),
            ..Default::default()
        }]);
        let registry = CurrencyRegistry::standard()
            .with_overrides_from(&provider)
            .unwrap();
        assert_eq!(registry.get("GBP").max_revenue, d("10000000"));

        let err = CurrencyRegistry::standard()
            .with_overrides_from(&FailingOverrides)
            .unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }
}
