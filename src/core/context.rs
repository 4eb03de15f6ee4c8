//! Session-level bundle of the configuration the pricing functions need.
use crate::core::cache::ScheduleCache;
use crate::core::config::AppConfig;
use crate::core::convert::CurrencyConverter;
use crate::core::currency::{CurrencyConfig, CurrencyRegistry};
use crate::core::error::Result;
use crate::core::plan::{PlanKind, Plans};
use crate::core::quote::{
    PlanComparison, Quote, break_even_revenue, compare_plans, quote_launch, quote_scale,
};
use crate::core::tiers::TierSchedule;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Immutable pricing inputs assembled once, plus a schedule memo.
///
/// Revenues given to and amounts returned from the quoting methods are in the
/// display currency.
#[derive(Clone)]
pub struct PricingContext {
    registry: CurrencyRegistry,
    plans: Plans,
    tier_count: u32,
    departments: u32,
    currency: String,
    schedules: ScheduleCache,
}

impl PricingContext {
    pub fn new(
        registry: CurrencyRegistry,
        plans: Plans,
        tier_count: u32,
        departments: u32,
        currency: &str,
    ) -> Result<Self> {
        plans.validate()?;
        let currency = registry.get(currency).code.clone();
        Ok(Self {
            registry,
            plans,
            tier_count,
            departments,
            currency,
            schedules: ScheduleCache::new(),
        })
    }

    /// Builds a context from a loaded config, applying its currency overrides.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let registry = CurrencyRegistry::standard().with_overrides_from(config)?;
        debug!("Registry has {} currencies after overrides", registry.len());
        Ok(Self::new(
            registry,
            config.plans,
            config.tier_count,
            config.departments,
            &config.currency,
        )?)
    }

    /// Same inputs, another display currency and department count.
    pub fn with_display(&self, currency: Option<&str>, departments: Option<u32>) -> Self {
        let mut context = self.clone();
        if let Some(code) = currency {
            context.currency = self.registry.get(code).code.clone();
        }
        if let Some(departments) = departments {
            context.departments = departments;
        }
        context
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    pub fn plans(&self) -> &Plans {
        &self.plans
    }

    pub fn departments(&self) -> u32 {
        self.departments
    }

    pub fn currency(&self) -> &CurrencyConfig {
        self.registry.get(&self.currency)
    }

    pub fn schedule(&self) -> Result<Arc<TierSchedule>> {
        self.schedules.get_or_generate(&self.plans.scale, self.tier_count)
    }

    fn converter(&self) -> CurrencyConverter<'_> {
        CurrencyConverter::new(&self.registry)
    }

    pub fn quote(&self, plan: PlanKind, revenue: Decimal) -> Result<Quote> {
        let base_revenue = self.converter().to_base(revenue, &self.currency);
        let quote = match plan {
            PlanKind::Launch => quote_launch(&self.registry, &self.plans.launch, base_revenue)?,
            PlanKind::Scale => {
                let schedule = self.schedule()?;
                quote_scale(
                    &self.registry,
                    &self.plans.scale,
                    &schedule,
                    self.departments,
                    base_revenue,
                )?
            }
        };
        Ok(quote.in_currency(&self.registry, &self.currency))
    }

    pub fn compare(&self, revenue: Decimal) -> Result<PlanComparison> {
        let base_revenue = self.converter().to_base(revenue, &self.currency);
        let schedule = self.schedule()?;
        let comparison = compare_plans(
            &self.registry,
            &self.plans.launch,
            &self.plans.scale,
            &schedule,
            self.departments,
            base_revenue,
        )?;
        Ok(comparison.in_currency(&self.registry, &self.currency))
    }

    /// Break-even revenue in the display currency.
    pub fn break_even(&self) -> Result<Option<Decimal>> {
        let schedule = self.schedule()?;
        let revenue = break_even_revenue(
            &self.plans.launch,
            &self.plans.scale,
            &schedule,
            self.departments,
        )?;
        Ok(revenue.map(|r| self.converter().from_base(r, &self.currency)))
    }

    /// Whether `revenue` exceeds the display cap of the display currency.
    pub fn exceeds_display_cap(&self, revenue: Decimal) -> bool {
        self.registry.clamp_revenue(revenue, &self.currency) < revenue
    }
}
