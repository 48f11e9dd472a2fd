use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use navfolio::core::log::init_logging;
use navfolio::core::projection::Frequency;

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

impl From<Commands> for navfolio::AppCommand {
    fn from(cmd: Commands) -> navfolio::AppCommand {
        match cmd {
            Commands::List => navfolio::AppCommand::List,
            Commands::Add { scheme_code } => navfolio::AppCommand::Add { scheme_code },
            Commands::Remove { fund_id } => navfolio::AppCommand::Remove { fund_id },
            Commands::Units { fund_id, units } => navfolio::AppCommand::Units { fund_id, units },
            Commands::Refresh => navfolio::AppCommand::Refresh,
            Commands::History { scheme_code, chart } => {
                navfolio::AppCommand::History { scheme_code, chart }
            }
            Commands::Project {
                fund_id,
                units,
                frequency,
                rate,
                years,
            } => navfolio::AppCommand::Project {
                fund_id,
                args: navfolio::ProjectionArgs {
                    contribution_units: units,
                    frequency,
                    growth_rate: rate,
                    years,
                },
            },
            Commands::Report => navfolio::AppCommand::Report,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List funds and total portfolio value
    List,
    /// Add a fund by its scheme code
    Add { scheme_code: String },
    /// Remove a fund
    Remove { fund_id: String },
    /// Set the number of units held in a fund
    Units {
        fund_id: String,
        #[arg(allow_negative_numbers = true)]
        units: f64,
    },
    /// Fetch the latest NAV for every fund
    Refresh,
    /// Show up to 365 days of NAV history for a fund
    History {
        scheme_code: String,
        /// Oldest first with a bar per day instead of a table
        #[arg(long)]
        chart: bool,
    },
    /// Project a fund's value with periodic unit purchases
    Project {
        fund_id: String,
        /// Units bought every period
        #[arg(long)]
        units: Option<f64>,
        /// daily, weekly, monthly or yearly
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Expected annual growth in percent
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<f64>,
        /// Number of years to project
        #[arg(long, allow_negative_numbers = true)]
        years: Option<i64>,
    },
    /// Show the portfolio report summary
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => navfolio::cli::setup::setup(),
        Some(cmd) => navfolio::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
