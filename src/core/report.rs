//! Report snapshots handed to PDF/XLSX renderers

use crate::core::error::{PortfolioError, PortfolioResult};
use crate::core::fund::Fund;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "portfolio-report.pdf",
            ReportFormat::Xlsx => "portfolio-report.xlsx",
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Pdf => write!(f, "PDF"),
            ReportFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

/// Point-in-time copy of a user's funds for reporting.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub user_name: String,
    pub funds: Vec<Fund>,
    pub total_value: f64,
    pub generated_at: DateTime<Utc>,
}

impl ReportSnapshot {
    pub fn new(funds: Vec<Fund>, user_name: &str) -> PortfolioResult<Self> {
        if funds.is_empty() {
            return Err(PortfolioError::validation("No fund data provided."));
        }
        let total_value = funds.iter().map(Fund::current_value).sum();
        let user_name = if user_name.trim().is_empty() {
            "N/A".to_string()
        } else {
            user_name.trim().to_string()
        };
        Ok(ReportSnapshot {
            user_name,
            funds,
            total_value,
            generated_at: Utc::now(),
        })
    }

    pub fn fund_count(&self) -> usize {
        self.funds.len()
    }

    /// Metric/value pairs for a report's summary section.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Portfolio For", self.user_name.clone()),
            ("Total Portfolio Value (INR)", format!("{:.2}", self.total_value)),
            ("Number of Funds", self.fund_count().to_string()),
            ("Report Generated On", self.generated_at.to_rfc2822()),
        ]
    }
}

/// Turns a snapshot into a downloadable document.
pub trait ReportRenderer {
    fn format(&self) -> ReportFormat;

    fn render(&self, snapshot: &ReportSnapshot) -> Result<Vec<u8>>;
}

/// Renders `snapshot` and writes it under `dir` with the format's fixed name.
pub fn write_report(
    renderer: &dyn ReportRenderer,
    snapshot: &ReportSnapshot,
    dir: &Path,
) -> Result<PathBuf> {
    let format = renderer.format();
    let bytes = renderer
        .render(snapshot)
        .with_context(|| format!("Failed to generate {format} report"))?;

    let path = dir.join(format.file_name());
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Wrote {} report to {}", format, path.display());
    Ok(path)
}
