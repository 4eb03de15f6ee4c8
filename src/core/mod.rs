//! Pricing core: tier schedules, take rates and currency presentation

pub mod cache;
pub mod config;
pub mod context;
pub mod convert;
pub mod currency;
pub mod error;
pub mod format;
pub mod log;
pub mod plan;
pub mod quote;
pub mod take_rate;
pub mod tiers;

// Re-export main types for cleaner imports
pub use cache::ScheduleCache;
pub use context::PricingContext;
pub use convert::{CurrencyConverter, convert_from_base, convert_to_base};
pub use currency::{CurrencyConfig, CurrencyOverride, CurrencyOverrideProvider, CurrencyRegistry};
pub use error::PricingError;
pub use format::{FormatOptions, format_compact_currency, format_currency, format_percentage};
pub use plan::{LaunchConfig, PlanKind, Plans, ScaleConfig};
pub use quote::{
    PlanComparison, Quote, break_even_revenue, compare_plans, quote_launch, quote_scale,
};
pub use take_rate::{TakeRate, resolve_take_rate};
pub use tiers::{ScaleTier, TierSchedule, generate_scale_tiers};
