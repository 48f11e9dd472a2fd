//! Fund holdings and the NAV values merged into them

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A single mutual fund holding in a user's portfolio.
///
/// `current_value` is always `nav * units`. Both fields are private so the
/// only way to change them is through [`Fund::set_units`] and
/// [`Fund::apply_nav`], which recompute the value together. Loading a stored
/// record recomputes it as well, whatever value was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredFund")]
pub struct Fund {
    pub id: String,
    pub scheme_code: String,
    pub name: String,
    pub category: String,
    units: f64,
    nav: f64,
    pub nav_date: Option<String>,
    current_value: f64,
}

/// Fund record as persisted. `current_value` is ignored on load.
#[derive(Deserialize)]
struct StoredFund {
    id: String,
    scheme_code: String,
    name: String,
    category: String,
    units: f64,
    nav: f64,
    nav_date: Option<String>,
}

impl From<StoredFund> for Fund {
    fn from(stored: StoredFund) -> Self {
        Fund {
            id: stored.id,
            scheme_code: stored.scheme_code,
            name: stored.name,
            category: stored.category,
            units: stored.units,
            nav: stored.nav,
            nav_date: stored.nav_date,
            current_value: stored.nav * stored.units,
        }
    }
}

/// Latest NAV for a scheme after parsing the upstream quote.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNav {
    pub nav: f64,
    pub name: String,
    pub date: String,
}

impl Fund {
    pub fn new(scheme_code: &str) -> Self {
        Fund {
            id: scheme_code.to_string(),
            scheme_code: scheme_code.to_string(),
            name: format!("Fund {scheme_code}"),
            category: DEFAULT_CATEGORY.to_string(),
            units: 0.0,
            nav: 0.0,
            nav_date: None,
            current_value: 0.0,
        }
    }

    pub fn units(&self) -> f64 {
        self.units
    }

    pub fn nav(&self) -> f64 {
        self.nav
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// True once a NAV has been merged from upstream.
    pub fn has_nav(&self) -> bool {
        self.nav > 0.0
    }

    /// Caller validates `units` (finite, non-negative).
    pub fn set_units(&mut self, units: f64) {
        self.units = units;
        self.current_value = self.nav * units;
    }

    /// Merges a reconciled quote. An empty upstream name keeps the current one.
    pub fn apply_nav(&mut self, resolved: &ResolvedNav) {
        self.nav = resolved.nav;
        self.current_value = resolved.nav * self.units;
        if !resolved.name.is_empty() {
            self.name = resolved.name.clone();
        }
        self.nav_date = Some(resolved.date.clone());
    }

    /// Name to show in tables, falls back to the scheme code.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.scheme_code
        } else {
            &self.name
        }
    }
}
