//! Batch refresh of latest NAVs against the upstream provider.

use crate::core::error::{PortfolioError, PortfolioResult};
use crate::core::fund::ResolvedNav;
use crate::core::nav::{NavProvider, NavQuote};
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Fetches the latest NAV for every scheme code concurrently.
///
/// Codes that fail for any reason are logged and left out of the result.
/// Fails only when the input is invalid or no code resolved at all.
pub async fn fetch_latest_navs(
    provider: &dyn NavProvider,
    scheme_codes: &[String],
    update_callback: &(dyn Fn() + Sync),
) -> PortfolioResult<HashMap<String, ResolvedNav>> {
    if scheme_codes.is_empty() {
        return Err(PortfolioError::validation("Scheme codes are required"));
    }
    if scheme_codes.iter().any(|code| code.trim().is_empty()) {
        return Err(PortfolioError::validation("Scheme codes must not be empty"));
    }

    let unique: BTreeSet<&str> = scheme_codes.iter().map(|c| c.trim()).collect();
    debug!("Fetching latest NAV for {} scheme(s)", unique.len());

    let futures = unique.into_iter().map(|code| async move {
        let result = provider
            .fetch_latest_nav(code)
            .await
            .and_then(|quote| parse_quote(code, quote));
        update_callback();
        (code, result)
    });

    let mut resolved = HashMap::new();
    for (code, result) in join_all(futures).await {
        match result {
            Ok(nav) => {
                debug!("Resolved NAV for scheme {}: {} ({})", code, nav.nav, nav.date);
                resolved.insert(code.to_string(), nav);
            }
            Err(e) => warn!(scheme_code = code, error = %e, "Skipping scheme after NAV fetch failure"),
        }
    }

    if resolved.is_empty() {
        return Err(PortfolioError::NoDataResolved);
    }
    Ok(resolved)
}

fn parse_quote(scheme_code: &str, quote: NavQuote) -> PortfolioResult<ResolvedNav> {
    let malformed = |reason: String| PortfolioError::MalformedResponse {
        scheme_code: scheme_code.to_string(),
        reason,
    };

    let nav = quote
        .nav
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(format!("unparsable NAV '{}': {e}", quote.nav)))?;
    if !nav.is_finite() {
        return Err(malformed(format!("unparsable NAV '{}'", quote.nav)));
    }
    if quote.date.trim().is_empty() {
        return Err(malformed("missing NAV date".to_string()));
    }

    Ok(ResolvedNav {
        nav,
        name: quote.name.trim().to_string(),
        date: quote.date.trim().to_string(),
    })
}
