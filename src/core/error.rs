//! Error kinds surfaced by portfolio operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Bad user input: missing or duplicate scheme code, bad units, bad
    /// projection parameters.
    #[error("{0}")]
    Validation(String),

    #[error("NAV source unavailable for scheme {scheme_code}: {reason}")]
    UpstreamUnavailable { scheme_code: String, reason: String },

    #[error("Malformed NAV response for scheme {scheme_code}: {reason}")]
    MalformedResponse { scheme_code: String, reason: String },

    #[error("Could not fetch NAV data for any of the provided schemes.")]
    NoDataResolved,

    #[error("Failed to save fund {fund_id}: {reason}")]
    Persistence { fund_id: String, reason: String },

    #[error("Failed to load funds: {0}")]
    Storage(String),
}

impl PortfolioError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortfolioError::Validation(message.into())
    }
}

pub type PortfolioResult<T> = std::result::Result<T, PortfolioError>;
