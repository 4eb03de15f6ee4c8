pub mod cli;
pub mod core;

use crate::core::config::AppConfig;
use crate::core::{PlanKind, PricingContext};
use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Commands that run against a loaded configuration.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Tiers {
        currency: Option<String>,
    },
    Quote {
        revenue: Decimal,
        plan: PlanKind,
        departments: Option<u32>,
        currency: Option<String>,
        json: bool,
    },
    Compare {
        revenue: Decimal,
        departments: Option<u32>,
        currency: Option<String>,
    },
    Currencies,
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("takerate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let context = PricingContext::from_config(&config)?;

    match command {
        AppCommand::Tiers { currency } => {
            cli::tiers::run(&context.with_display(currency.as_deref(), None))
        }
        AppCommand::Quote {
            revenue,
            plan,
            departments,
            currency,
            json,
        } => cli::quote::run(
            &context.with_display(currency.as_deref(), departments),
            plan,
            revenue,
            json,
        ),
        AppCommand::Compare {
            revenue,
            departments,
            currency,
        } => cli::compare::run(
            &context.with_display(currency.as_deref(), departments),
            revenue,
        ),
        AppCommand::Currencies => {
            cli::currencies::run(context.registry());
            Ok(())
        }
    }
}
