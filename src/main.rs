use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use takerate::core::PlanKind;
use takerate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for takerate::AppCommand {
    fn from(cmd: Commands) -> takerate::AppCommand {
        match cmd {
            Commands::Tiers { currency } => takerate::AppCommand::Tiers { currency },
            Commands::Quote {
                revenue,
                plan,
                departments,
                currency,
                json,
            } => takerate::AppCommand::Quote {
                revenue,
                plan,
                departments,
                currency,
                json,
            },
            Commands::Compare {
                revenue,
                departments,
                currency,
            } => takerate::AppCommand::Compare {
                revenue,
                departments,
                currency,
            },
            Commands::Currencies => takerate::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the Scale plan tier schedule
    Tiers {
        /// Display currency code
        #[arg(long)]
        currency: Option<String>,
    },
    /// Display the monthly cost of a plan
    Quote {
        /// Monthly revenue in the display currency
        #[arg(short, long)]
        revenue: Decimal,
        /// Plan to quote (launch or scale)
        #[arg(short, long, default_value = "scale")]
        plan: PlanKind,
        /// Number of departments on the Scale plan
        #[arg(short, long)]
        departments: Option<u32>,
        /// Display currency code
        #[arg(long)]
        currency: Option<String>,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare both plans and show the break-even revenue
    Compare {
        /// Monthly revenue in the display currency
        #[arg(short, long)]
        revenue: Decimal,
        /// Number of departments on the Scale plan
        #[arg(short, long)]
        departments: Option<u32>,
        /// Display currency code
        #[arg(long)]
        currency: Option<String>,
    },
    /// Display the currency table
    Currencies,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => takerate::cli::setup::setup(),
        Some(cmd) => takerate::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
