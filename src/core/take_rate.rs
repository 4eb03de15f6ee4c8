//! Resolution of the effective take rate for a revenue figure.
use crate::core::error::{PricingError, Result, ensure_amount};
use crate::core::tiers::ScaleTier;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// The tier a revenue figure falls into and the rate it pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TakeRate {
    pub tier: ScaleTier,
    pub effective_rate: Decimal,
}

pub(crate) fn ensure_ordered(tiers: &[ScaleTier]) -> Result<()> {
    match tiers
        .windows(2)
        .find(|pair| pair[1].revenue_threshold <= pair[0].revenue_threshold)
    {
        Some(pair) => Err(PricingError::UnorderedSchedule { tier: pair[1].tier }),
        None => Ok(()),
    }
}

/// Picks the tier with the greatest threshold at or below `revenue`.
///
/// Revenue below every threshold resolves to the first tier, revenue above
/// every threshold to the last. A revenue exactly on a threshold belongs to
/// the tier starting there.
pub fn resolve_take_rate(tiers: &[ScaleTier], revenue: Decimal) -> Result<TakeRate> {
    let revenue = ensure_amount("revenue", revenue)?;
    if tiers.is_empty() {
        return Err(PricingError::EmptySchedule);
    }
    ensure_ordered(tiers)?;

    let above = tiers.partition_point(|tier| tier.revenue_threshold <= revenue);
    let tier = tiers[above.saturating_sub(1)];
    debug!(
        "Revenue {revenue} resolved to tier {} at rate {}",
        tier.tier, tier.take_rate
    );

    Ok(TakeRate {
        tier,
        effective_rate: tier.take_rate,
    })
}
