//! Cost breakdowns for a revenue figure and comparisons between the plans.
use crate::core::convert::CurrencyConverter;
use crate::core::currency::CurrencyRegistry;
use crate::core::error::{PricingError, Result};
use crate::core::plan::{LaunchConfig, PlanKind, ScaleConfig};
use crate::core::take_rate::{ensure_ordered, resolve_take_rate};
use crate::core::tiers::ScaleTier;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Monthly cost of one plan at one revenue figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub plan: PlanKind,
    pub currency: String,
    pub revenue: Decimal,
    pub fixed_monthly: Decimal,
    pub department_cost: Decimal,
    pub revenue_fee: Decimal,
    pub total: Decimal,
    pub effective_rate: Decimal,
    /// Resolved tier, Scale quotes only.
    pub tier: Option<u32>,
}

impl Quote {
    /// Re-expresses every money field of a base-currency quote in `code`.
    pub fn in_currency(&self, registry: &CurrencyRegistry, code: &str) -> Quote {
        let converter = CurrencyConverter::new(registry);
        let convert = |amount| converter.convert(amount, &self.currency, code);
        Quote {
            plan: self.plan,
            currency: registry.get(code).code.clone(),
            revenue: convert(self.revenue),
            fixed_monthly: convert(self.fixed_monthly),
            department_cost: convert(self.department_cost),
            revenue_fee: convert(self.revenue_fee),
            total: convert(self.total),
            effective_rate: self.effective_rate,
            tier: self.tier,
        }
    }
}

pub fn quote_launch(
    registry: &CurrencyRegistry,
    config: &LaunchConfig,
    revenue: Decimal,
) -> Result<Quote> {
    let total = config.monthly_fee(revenue)?;
    Ok(Quote {
        plan: PlanKind::Launch,
        currency: registry.base().code.clone(),
        revenue,
        fixed_monthly: config.fixed_monthly,
        department_cost: Decimal::ZERO,
        revenue_fee: config.revenue_percentage * revenue,
        total,
        effective_rate: config.revenue_percentage,
        tier: None,
    })
}

pub fn quote_scale(
    registry: &CurrencyRegistry,
    config: &ScaleConfig,
    tiers: &[ScaleTier],
    departments: u32,
    revenue: Decimal,
) -> Result<Quote> {
    let resolved = resolve_take_rate(tiers, revenue)?;
    let total = config.monthly_fee(resolved.effective_rate, departments, revenue)?;
    Ok(Quote {
        plan: PlanKind::Scale,
        currency: registry.base().code.clone(),
        revenue,
        fixed_monthly: config.fixed_monthly,
        department_cost: config.per_department * Decimal::from(departments),
        revenue_fee: resolved.effective_rate * revenue,
        total,
        effective_rate: resolved.effective_rate,
        tier: Some(resolved.tier.tier),
    })
}

/// Both quotes for the same revenue and which plan costs less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanComparison {
    pub launch: Quote,
    pub scale: Quote,
    /// Scale wins ties.
    pub cheaper: PlanKind,
    pub saving: Decimal,
}

impl PlanComparison {
    pub fn in_currency(&self, registry: &CurrencyRegistry, code: &str) -> PlanComparison {
        let launch = self.launch.in_currency(registry, code);
        let scale = self.scale.in_currency(registry, code);
        let saving = (launch.total - scale.total).abs();
        PlanComparison {
            launch,
            scale,
            cheaper: self.cheaper,
            saving,
        }
    }
}

pub fn compare_plans(
    registry: &CurrencyRegistry,
    launch: &LaunchConfig,
    scale: &ScaleConfig,
    tiers: &[ScaleTier],
    departments: u32,
    revenue: Decimal,
) -> Result<PlanComparison> {
    let launch = quote_launch(registry, launch, revenue)?;
    let scale = quote_scale(registry, scale, tiers, departments, revenue)?;
    let cheaper = if scale.total <= launch.total {
        PlanKind::Scale
    } else {
        PlanKind::Launch
    };
    let saving = (launch.total - scale.total).abs();
    debug!("At revenue {revenue} the {cheaper} plan is cheaper by {saving}");

    Ok(PlanComparison {
        launch,
        scale,
        cheaper,
        saving,
    })
}

/// Smallest non-negative revenue at which Scale costs no more than Launch.
///
/// Both fees are linear within each tier band, so the crossing is solved per
/// band in ascending order. The first band also covers revenue below its
/// threshold and the last band extends without bound. Returns `None` when
/// Scale is never the cheaper plan.
pub fn break_even_revenue(
    launch: &LaunchConfig,
    scale: &ScaleConfig,
    tiers: &[ScaleTier],
    departments: u32,
) -> Result<Option<Decimal>> {
    launch.validate()?;
    scale.validate()?;
    if tiers.is_empty() {
        return Err(PricingError::EmptySchedule);
    }
    ensure_ordered(tiers)?;

    // scale - launch = offset + (rate - launch_pct) * revenue
    let offset = scale.fixed_monthly + scale.per_department * Decimal::from(departments)
        - launch.fixed_monthly;

    for (i, tier) in tiers.iter().enumerate() {
        let low = if i == 0 {
            Decimal::ZERO
        } else {
            tier.revenue_threshold
        };
        let high = tiers.get(i + 1).map(|next| next.revenue_threshold);
        let slope = tier.take_rate - launch.revenue_percentage;

        let candidate = if offset + slope * low <= Decimal::ZERO {
            Some(low)
        } else if slope < Decimal::ZERO {
            Some((offset / -slope).max(low))
        } else {
            None
        };

        if let Some(revenue) = candidate
            && high.is_none_or(|high| revenue < high)
        {
            debug!("Break-even revenue {revenue} in tier {}", tier.tier);
            return Ok(Some(revenue));
        }
    }

    debug!("Scale plan never undercuts Launch");
    Ok(None)
}
