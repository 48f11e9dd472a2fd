use crate::core::projection::{Assumptions, Frequency};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Identity under which funds are stored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UserContext {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

impl Default for UserContext {
    fn default() -> Self {
        UserContext {
            id: "local".to_string(),
            display_name: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MfApiProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for MfApiProviderConfig {
    fn default() -> Self {
        MfApiProviderConfig {
            base_url: "https://api.mfapi.in".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub mfapi: MfApiProviderConfig,
}

/// Defaults for `navfolio project` when flags are omitted.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProjectionConfig {
    pub growth_rate: f64,
    pub years: i64,
    pub contribution_units: f64,
    pub frequency: Frequency,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let defaults = Assumptions::default();
        ProjectionConfig {
            growth_rate: defaults.growth_rate,
            years: defaults.years,
            contribution_units: defaults.contribution_units,
            frequency: defaults.frequency,
        }
    }
}

impl From<&ProjectionConfig> for Assumptions {
    fn from(config: &ProjectionConfig) -> Self {
        Assumptions {
            contribution_units: config.contribution_units,
            frequency: config.frequency,
            growth_rate: config.growth_rate,
            years: config.years,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserContext,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "navfolio", "navfolio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "navfolio", "navfolio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        if config.user.id.trim().is_empty() {
            anyhow::bail!("user.id must not be empty");
        }
        debug!("Successfully loaded config");
        Ok(config)
    }
}
