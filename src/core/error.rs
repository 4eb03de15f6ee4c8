//! Typed errors for the pricing core.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the pricing core when its inputs are malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A money amount was negative
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A rate fell outside the closed interval [0, 1]
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// Resolution was attempted against a schedule with no tiers
    #[error("tier schedule is empty")]
    EmptySchedule,

    /// A caller-supplied schedule is not ordered by threshold
    #[error("tier {tier} does not have a higher revenue threshold than the tier before it")]
    UnorderedSchedule { tier: u32 },

    /// A generated threshold does not fit in a `Decimal`
    #[error("revenue threshold of tier {tier} is too large to represent")]
    ThresholdOverflow { tier: u32 },

    #[error("conversion rate for {code} must be positive, got {rate}")]
    InvalidConversionRate { code: String, rate: Decimal },

    /// The base currency always converts at exactly 1
    #[error("conversion rate of base currency {code} cannot be changed")]
    BaseRateOverride { code: String },

    /// An override introduced a new currency without all of its fields
    #[error("new currency {code} is missing field {field}")]
    IncompleteCurrency { code: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, PricingError>;

/// Rejects negative money amounts.
pub(crate) fn ensure_amount(field: &'static str, value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::NegativeAmount { field, value });
    }
    Ok(value)
}

/// Rejects rates outside [0, 1].
pub(crate) fn ensure_rate(field: &'static str, value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PricingError::RateOutOfRange { field, value });
    }
    Ok(value)
}
