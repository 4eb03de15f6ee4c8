//! Conversion between the base currency and registered currencies.
use crate::core::currency::CurrencyRegistry;
use rust_decimal::Decimal;
use tracing::{debug, warn};

fn saturate(amount: Decimal) -> Decimal {
    if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Converts amounts using the rates of a borrowed registry.
///
/// Unknown codes convert as the base currency, i.e. unchanged. Results that
/// do not fit in a `Decimal` saturate at `Decimal::MAX` or `Decimal::MIN`.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyConverter<'a> {
    registry: &'a CurrencyRegistry,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(registry: &'a CurrencyRegistry) -> Self {
        Self { registry }
    }

    /// `amount * rate(code)`
    pub fn from_base(&self, amount: Decimal, code: &str) -> Decimal {
        let rate = self.registry.get(code).conversion_rate;
        amount.checked_mul(rate).unwrap_or_else(|| {
            warn!("Converting {amount} to {code} overflowed, saturating");
            saturate(amount)
        })
    }

    /// `amount / rate(code)`
    pub fn to_base(&self, amount: Decimal, code: &str) -> Decimal {
        // Registry rates are always positive.
        let rate = self.registry.get(code).conversion_rate;
        amount.checked_div(rate).unwrap_or_else(|| {
            warn!("Converting {amount} from {code} overflowed, saturating");
            saturate(amount)
        })
    }

    /// Converts between two currencies through the base currency.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        let from_config = self.registry.get(from);
        let to_config = self.registry.get(to);
        if from_config.code == to_config.code {
            debug!("No currency conversion needed ({} -> {})", from, to);
            return amount;
        }

        let converted = self.from_base(self.to_base(amount, from), to);
        debug!(
            "Converted {amount} from {} to {}: {converted}",
            from_config.code, to_config.code
        );
        converted
    }
}

/// Converts a base-currency amount into `code` using `registry`.
pub fn convert_from_base(registry: &CurrencyRegistry, amount: Decimal, code: &str) -> Decimal {
    CurrencyConverter::new(registry).from_base(amount, code)
}

/// Converts an amount in `code` back into the base currency using `registry`.
pub fn convert_to_base(registry: &CurrencyRegistry, amount: Decimal, code: &str) -> Decimal {
    CurrencyConverter::new(registry).to_base(amount, code)
}
