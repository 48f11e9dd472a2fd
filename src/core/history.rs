//! NAV history views derived from a single upstream fetch

use crate::core::error::PortfolioError;
use crate::core::fund::Fund;
use crate::core::nav::{MAX_HISTORY_ENTRIES, RawNavPoint};
use chrono::NaiveDate;

pub const UPSTREAM_DATE_FORMAT: &str = "%d-%m-%Y";
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Clone, PartialEq)]
pub struct NavHistoryEntry {
    pub date: String,
    pub nav: String,
    /// `None` when upstream sent something that is not a number.
    pub nav_value: Option<f64>,
    pub formatted_date: String,
}

impl From<RawNavPoint> for NavHistoryEntry {
    fn from(point: RawNavPoint) -> Self {
        let nav_value = point.nav.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        let formatted_date = format_nav_date(&point.date);
        NavHistoryEntry {
            date: point.date,
            nav: point.nav,
            nav_value,
            formatted_date,
        }
    }
}

/// `05-01-2024` becomes `Jan 5, 2024`. Unparsable dates are returned as-is.
pub fn format_nav_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, UPSTREAM_DATE_FORMAT)
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// History for one fund in both display orders.
#[derive(Debug, Clone, PartialEq)]
pub struct NavHistory {
    /// Newest first.
    pub table: Vec<NavHistoryEntry>,
    /// Oldest first, for plotting.
    pub chart: Vec<NavHistoryEntry>,
}

impl NavHistory {
    /// Builds both orders from upstream points, which arrive newest first.
    pub fn from_points(points: Vec<RawNavPoint>) -> Self {
        let table: Vec<NavHistoryEntry> = points
            .into_iter()
            .take(MAX_HISTORY_ENTRIES)
            .map(NavHistoryEntry::from)
            .collect();
        let chart = table.iter().rev().cloned().collect();
        NavHistory { table, chart }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// What a history panel should show.
#[derive(Debug)]
pub enum HistoryView {
    NoFundSelected,
    NotFetched,
    Empty,
    Failed(PortfolioError),
    Loaded(NavHistory),
}

impl HistoryView {
    pub fn resolve(
        selected: Option<&Fund>,
        fetched: Option<Result<NavHistory, PortfolioError>>,
    ) -> Self {
        match (selected, fetched) {
            (None, _) => HistoryView::NoFundSelected,
            (Some(_), None) => HistoryView::NotFetched,
            (Some(_), Some(Err(e))) => HistoryView::Failed(e),
            (Some(_), Some(Ok(history))) if history.is_empty() => HistoryView::Empty,
            (Some(_), Some(Ok(history))) => HistoryView::Loaded(history),
        }
    }

    /// Placeholder text for every state except `Loaded`.
    pub fn message(&self) -> Option<String> {
        match self {
            HistoryView::NoFundSelected => Some("Add a fund to view its history.".to_string()),
            HistoryView::NotFetched => Some(
                "Run `navfolio history <scheme-code>` to fetch the 365-day NAV data.".to_string(),
            ),
            HistoryView::Empty => Some("No history data available for this fund.".to_string()),
            HistoryView::Failed(e) => Some(e.to_string()),
            HistoryView::Loaded(_) => None,
        }
    }
}
