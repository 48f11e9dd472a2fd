//! NAV provider abstractions and raw upstream types

use crate::core::error::PortfolioResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Upstream returns at most this many history points we care about.
pub const MAX_HISTORY_ENTRIES: usize = 365;

/// Latest quote for a scheme as published upstream. `nav` is kept as the
/// string received; parsing happens during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavQuote {
    pub name: String,
    pub nav: String,
    pub date: String,
}

/// One historical point as received, `date` in `dd-MM-yyyy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNavPoint {
    pub date: String,
    pub nav: String,
}

#[async_trait]
pub trait NavProvider: Send + Sync {
    async fn fetch_latest_nav(&self, scheme_code: &str) -> PortfolioResult<NavQuote>;

    /// Newest first, capped at [`MAX_HISTORY_ENTRIES`].
    async fn fetch_nav_history(&self, scheme_code: &str) -> PortfolioResult<Vec<RawNavPoint>>;
}
