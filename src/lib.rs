pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::Portfolio;
use crate::core::config::AppConfig;
use crate::core::projection::Frequency;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Overrides for the configured projection assumptions.
#[derive(Debug, Clone, Default)]
pub struct ProjectionArgs {
    pub contribution_units: Option<f64>,
    pub frequency: Option<Frequency>,
    pub growth_rate: Option<f64>,
    pub years: Option<i64>,
}

pub enum AppCommand {
    List,
    Add { scheme_code: String },
    Remove { fund_id: String },
    Units { fund_id: String, units: f64 },
    Refresh,
    History { scheme_code: String, chart: bool },
    Project { fund_id: String, args: ProjectionArgs },
    Report,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("NAV tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open_fund_store(&config)?;
    let provider = Arc::new(providers::MfApiProvider::new(&config.providers.mfapi)?);
    let portfolio = Portfolio::new(config.user.clone(), store, provider);

    match command {
        AppCommand::List => cli::funds::list(&portfolio).await,
        AppCommand::Add { scheme_code } => cli::funds::add(&portfolio, &scheme_code).await,
        AppCommand::Remove { fund_id } => cli::funds::remove(&portfolio, &fund_id).await,
        AppCommand::Units { fund_id, units } => {
            cli::funds::set_units(&portfolio, &fund_id, units).await
        }
        AppCommand::Refresh => cli::refresh::run(&portfolio).await,
        AppCommand::History { scheme_code, chart } => {
            cli::history::run(&portfolio, &scheme_code, chart).await
        }
        AppCommand::Project { fund_id, args } => {
            cli::projection::run(&portfolio, &fund_id, &args, &config.projection).await
        }
        AppCommand::Report => cli::report::run(&portfolio).await,
    }
}
