//! Fund lifecycle and NAV refresh for one user's portfolio.
use crate::core::config::UserContext;
use crate::core::error::{PortfolioError, PortfolioResult};
use crate::core::fund::Fund;
use crate::core::history::NavHistory;
use crate::core::nav::NavProvider;
use crate::core::projection::{Assumptions, ProjectionInput, ProjectionPoint, project};
use crate::core::reconcile::fetch_latest_navs;
use crate::core::report::ReportSnapshot;
use crate::core::store::FundStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A user's portfolio with its collaborators passed in explicitly.
pub struct Portfolio {
    user: UserContext,
    store: Arc<dyn FundStore>,
    provider: Arc<dyn NavProvider>,
}

/// Result of a NAV refresh across the portfolio.
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    /// Funds whose NAV was merged and saved.
    pub updated: Vec<Fund>,
    /// Scheme codes upstream could not resolve; those funds are untouched.
    pub unresolved: Vec<String>,
    /// Funds merged in memory but not saved.
    pub persist_failures: Vec<PortfolioError>,
}

impl Portfolio {
    pub fn new(
        user: UserContext,
        store: Arc<dyn FundStore>,
        provider: Arc<dyn NavProvider>,
    ) -> Self {
        Portfolio {
            user,
            store,
            provider,
        }
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    fn persistence_error(fund_id: &str, e: anyhow::Error) -> PortfolioError {
        PortfolioError::Persistence {
            fund_id: fund_id.to_string(),
            reason: format!("{e:#}"),
        }
    }

    /// All funds, ordered by scheme code.
    pub async fn list_funds(&self) -> PortfolioResult<Vec<Fund>> {
        let mut funds = self
            .store
            .list_funds(&self.user.id)
            .await
            .map_err(|e| PortfolioError::Storage(format!("{e:#}")))?;
        funds.sort_by(|a, b| a.scheme_code.cmp(&b.scheme_code));
        Ok(funds)
    }

    pub async fn find_fund(&self, fund_id: &str) -> PortfolioResult<Option<Fund>> {
        self.store
            .get_fund(&self.user.id, fund_id)
            .await
            .map_err(|e| PortfolioError::Storage(format!("{e:#}")))
    }

    async fn require_fund(&self, fund_id: &str) -> PortfolioResult<Fund> {
        self.find_fund(fund_id)
            .await?
            .ok_or_else(|| PortfolioError::validation(format!("Fund {fund_id} not found.")))
    }

    pub async fn add_fund(&self, scheme_code: &str) -> PortfolioResult<Fund> {
        let scheme_code = scheme_code.trim();
        if scheme_code.is_empty() {
            return Err(PortfolioError::validation("Scheme code is required."));
        }

        let existing = self.list_funds().await?;
        if existing.iter().any(|f| f.scheme_code == scheme_code) {
            return Err(PortfolioError::validation(
                "This fund is already in your portfolio.",
            ));
        }

        let fund = Fund::new(scheme_code);
        self.store
            .put_fund(&self.user.id, &fund)
            .await
            .map_err(|e| Self::persistence_error(&fund.id, e))?;
        info!("Added fund {} for user {}", fund.id, self.user.id);
        Ok(fund)
    }

    pub async fn update_units(&self, fund_id: &str, units: f64) -> PortfolioResult<Fund> {
        if !units.is_finite() || units < 0.0 {
            return Err(PortfolioError::validation(
                "Units must be a non-negative number.",
            ));
        }

        let mut fund = self.require_fund(fund_id).await?;
        fund.set_units(units);
        self.store
            .put_fund(&self.user.id, &fund)
            .await
            .map_err(|e| Self::persistence_error(fund_id, e))?;
        debug!(
            "Updated units for {} to {} (value {})",
            fund_id,
            units,
            fund.current_value()
        );
        Ok(fund)
    }

    pub async fn delete_fund(&self, fund_id: &str) -> PortfolioResult<()> {
        self.require_fund(fund_id).await?;
        self.store
            .delete_fund(&self.user.id, fund_id)
            .await
            .map_err(|e| Self::persistence_error(fund_id, e))?;
        info!("Deleted fund {} for user {}", fund_id, self.user.id);
        Ok(())
    }

    /// Refreshes every fund's NAV and saves each merged fund on its own.
    ///
    /// Fails only if there are no funds or no scheme resolved. A failed save
    /// is reported in the outcome and does not stop the remaining saves.
    pub async fn refresh_navs(
        &self,
        update_callback: &(dyn Fn() + Sync),
    ) -> PortfolioResult<RefreshOutcome> {
        let funds = self.list_funds().await?;
        if funds.is_empty() {
            return Err(PortfolioError::validation("No funds to refresh."));
        }

        let scheme_codes: Vec<String> = funds.iter().map(|f| f.scheme_code.clone()).collect();
        let resolved =
            fetch_latest_navs(self.provider.as_ref(), &scheme_codes, update_callback).await?;

        let mut outcome = RefreshOutcome::default();
        for mut fund in funds {
            let Some(latest) = resolved.get(&fund.scheme_code) else {
                outcome.unresolved.push(fund.scheme_code.clone());
                continue;
            };

            fund.apply_nav(latest);
            match self.store.put_fund(&self.user.id, &fund).await {
                Ok(()) => outcome.updated.push(fund),
                Err(e) => {
                    warn!(fund_id = %fund.id, error = %e, "Failed to save refreshed fund");
                    outcome
                        .persist_failures
                        .push(Self::persistence_error(&fund.id, e));
                }
            }
        }

        info!(
            "NAV refresh: {} updated, {} unresolved, {} not saved",
            outcome.updated.len(),
            outcome.unresolved.len(),
            outcome.persist_failures.len()
        );
        Ok(outcome)
    }

    /// Up to 365 days of NAV history for a scheme.
    pub async fn nav_history(&self, scheme_code: &str) -> PortfolioResult<NavHistory> {
        let scheme_code = scheme_code.trim();
        if scheme_code.is_empty() {
            return Err(PortfolioError::validation("Scheme code is required."));
        }
        let points = self.provider.fetch_nav_history(scheme_code).await?;
        Ok(NavHistory::from_points(points))
    }

    /// Projects a fund's value. An empty series means the fund or the
    /// assumptions cannot be projected.
    pub async fn project(
        &self,
        fund_id: &str,
        assumptions: &Assumptions,
    ) -> PortfolioResult<Vec<ProjectionPoint>> {
        let fund = self.require_fund(fund_id).await?;
        Ok(project(&ProjectionInput::for_fund(&fund, assumptions)))
    }

    pub async fn total_value(&self) -> PortfolioResult<f64> {
        Ok(self
            .list_funds()
            .await?
            .iter()
            .map(Fund::current_value)
            .sum())
    }

    pub async fn report_snapshot(&self) -> PortfolioResult<ReportSnapshot> {
        ReportSnapshot::new(self.list_funds().await?, &self.user.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reconcile::tests::MockNavProvider;
    use crate::store::memory::MemoryFundStore;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashSet;

    /// Wraps a memory store and fails writes for chosen fund ids.
    struct FlakyStore {
        inner: MemoryFundStore,
        fail_on: HashSet<String>,
    }

    #[async_trait]
    impl FundStore for FlakyStore {
        async fn list_funds(&self, user_id: &str) -> Result<Vec<Fund>> {
            self.inner.list_funds(user_id).await
        }

        async fn get_fund(&self, user_id: &str, fund_id: &str) -> Result<Option<Fund>> {
            self.inner.get_fund(user_id, fund_id).await
        }

        async fn put_fund(&self, user_id: &str, fund: &Fund) -> Result<()> {
            if self.fail_on.contains(&fund.id) {
                anyhow::bail!("write rejected");
            }
            self.inner.put_fund(user_id, fund).await
        }

        async fn delete_fund(&self, user_id: &str, fund_id: &str) -> Result<()> {
            self.inner.delete_fund(user_id, fund_id).await
        }
    }

    fn user() -> UserContext {
        UserContext {
            id: "alice".to_string(),
            display_name: "Alice".to_string(),
        }
    }

    fn provider() -> MockNavProvider {
        MockNavProvider::new()
            .with_quote("100", "Alpha Fund", "10.0", "01-03-2024")
            .with_quote("200", "Beta Fund", "20.5", "01-03-2024")
            .with_history("100", &[("02-03-2024", "10.5"), ("01-03-2024", "10.0")])
    }

    fn portfolio_with(store: Arc<dyn FundStore>) -> Portfolio {
        Portfolio::new(user(), store, Arc::new(provider()))
    }

    fn portfolio() -> Portfolio {
        portfolio_with(Arc::new(MemoryFundStore::new()))
    }

    #[tokio::test]
    async fn test_add_fund() {
        let portfolio = portfolio();
        let fund = portfolio.add_fund(" 100 ").await.unwrap();

        assert_eq!(fund.scheme_code, "100");
        assert_eq!(fund.name, "Fund 100");
        assert_eq!(portfolio.list_funds().await.unwrap(), vec![fund]);
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();
        portfolio.update_units("100", 5.0).await.unwrap();
        let before = portfolio.list_funds().await.unwrap();

        let result = portfolio.add_fund("100").await;
        match result {
            Err(PortfolioError::Validation(msg)) => {
                assert_eq!(msg, "This fund is already in your portfolio.")
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
        assert_eq!(portfolio.list_funds().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_empty_scheme_code_rejected() {
        let portfolio = portfolio();
        assert!(matches!(
            portfolio.add_fund("   ").await,
            Err(PortfolioError::Validation(_))
        ));
        assert!(portfolio.list_funds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_units_keeps_value_in_sync() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();
        portfolio.refresh_navs(&|| {}).await.unwrap();

        let fund = portfolio.update_units("100", 7.5).await.unwrap();
        assert_eq!(fund.current_value(), 75.0);

        let stored = portfolio.find_fund("100").await.unwrap().unwrap();
        assert_eq!(stored.current_value(), stored.nav() * stored.units());
    }

    #[tokio::test]
    async fn test_update_units_validation() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();

        assert!(matches!(
            portfolio.update_units("100", -1.0).await,
            Err(PortfolioError::Validation(_))
        ));
        assert!(matches!(
            portfolio.update_units("100", f64::NAN).await,
            Err(PortfolioError::Validation(_))
        ));
        assert!(matches!(
            portfolio.update_units("999", 1.0).await,
            Err(PortfolioError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_fund() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();
        portfolio.add_fund("200").await.unwrap();

        portfolio.delete_fund("100").await.unwrap();
        let funds = portfolio.list_funds().await.unwrap();
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].id, "200");

        assert!(matches!(
            portfolio.delete_fund("100").await,
            Err(PortfolioError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_merges_resolved_and_skips_unresolved() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();
        portfolio.add_fund("200").await.unwrap();
        portfolio.add_fund("300").await.unwrap();
        portfolio.update_units("100", 3.0).await.unwrap();
        portfolio.update_units("200", 2.0).await.unwrap();
        portfolio.update_units("300", 1.0).await.unwrap();

        let outcome = portfolio.refresh_navs(&|| {}).await.unwrap();
        assert_eq!(outcome.updated.len(), 2);
        assert_eq!(outcome.unresolved, vec!["300".to_string()]);
        assert!(outcome.persist_failures.is_empty());

        let alpha = portfolio.find_fund("100").await.unwrap().unwrap();
        assert_eq!(alpha.name, "Alpha Fund");
        assert_eq!(alpha.nav(), 10.0);
        assert_eq!(alpha.current_value(), 30.0);
        assert_eq!(alpha.nav_date.as_deref(), Some("01-03-2024"));

        let untouched = portfolio.find_fund("300").await.unwrap().unwrap();
        assert_eq!(untouched.name, "Fund 300");
        assert_eq!(untouched.nav(), 0.0);
        assert!(untouched.nav_date.is_none());

        assert_eq!(portfolio.total_value().await.unwrap(), 71.0);
    }

    #[tokio::test]
    async fn test_refresh_fails_when_nothing_resolves() {
        let portfolio = portfolio();
        portfolio.add_fund("300").await.unwrap();
        portfolio.add_fund("400").await.unwrap();

        let result = portfolio.refresh_navs(&|| {}).await;
        assert!(matches!(result, Err(PortfolioError::NoDataResolved)));

        let funds = portfolio.list_funds().await.unwrap();
        assert!(funds.iter().all(|f| f.nav() == 0.0));
    }

    #[tokio::test]
    async fn test_refresh_empty_portfolio_rejected() {
        let result = portfolio().refresh_navs(&|| {}).await;
        assert!(matches!(result, Err(PortfolioError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_persist_failure_does_not_block_siblings() {
        let inner = MemoryFundStore::new();
        inner.put_fund("alice", &Fund::new("100")).await.unwrap();
        inner.put_fund("alice", &Fund::new("200")).await.unwrap();
        let store = Arc::new(FlakyStore {
            inner: inner.clone(),
            fail_on: HashSet::from(["100".to_string()]),
        });
        let portfolio = portfolio_with(store);

        let outcome = portfolio.refresh_navs(&|| {}).await.unwrap();
        assert_eq!(outcome.updated.len(), 1);
        assert_eq!(outcome.updated[0].id, "200");
        assert_eq!(outcome.persist_failures.len(), 1);
        assert!(matches!(
            &outcome.persist_failures[0],
            PortfolioError::Persistence { fund_id, .. } if fund_id == "100"
        ));

        let saved = inner.get_fund("alice", "200").await.unwrap().unwrap();
        assert_eq!(saved.nav(), 20.5);
        let failed = inner.get_fund("alice", "100").await.unwrap().unwrap();
        assert_eq!(failed.nav(), 0.0);
    }

    #[tokio::test]
    async fn test_nav_history() {
        let portfolio = portfolio();

        let history = portfolio.nav_history("100").await.unwrap();
        assert_eq!(history.table[0].date, "02-03-2024");
        assert_eq!(history.chart[0].date, "01-03-2024");

        assert!(matches!(
            portfolio.nav_history("999").await,
            Err(PortfolioError::UpstreamUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_project_fund() {
        let portfolio = portfolio();
        portfolio.add_fund("100").await.unwrap();
        let assumptions = Assumptions {
            years: 2,
            ..Assumptions::default()
        };

        // No NAV yet, nothing to project
        assert!(portfolio.project("100", &assumptions).await.unwrap().is_empty());

        portfolio.update_units("100", 100.0).await.unwrap();
        portfolio.refresh_navs(&|| {}).await.unwrap();
        let series = portfolio.project("100", &assumptions).await.unwrap();
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1000.0, 1100.0, 1210.0]);
    }

    #[tokio::test]
    async fn test_report_snapshot() {
        let portfolio = portfolio();
        assert!(matches!(
            portfolio.report_snapshot().await,
            Err(PortfolioError::Validation(_))
        ));

        portfolio.add_fund("100").await.unwrap();
        let snapshot = portfolio.report_snapshot().await.unwrap();
        assert_eq!(snapshot.user_name, "Alice");
        assert_eq!(snapshot.fund_count(), 1);
    }
}
