use crate::core::fund::Fund;
use crate::core::store::FundStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory fund store keyed by user, then fund id.
#[derive(Clone, Default)]
pub struct MemoryFundStore {
    inner: Arc<Mutex<HashMap<String, BTreeMap<String, Fund>>>>,
}

impl MemoryFundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FundStore for MemoryFundStore {
    async fn list_funds(&self, user_id: &str) -> Result<Vec<Fund>> {
        let users = self.inner.lock().await;
        Ok(users
            .get(user_id)
            .map(|funds| funds.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_fund(&self, user_id: &str, fund_id: &str) -> Result<Option<Fund>> {
        let users = self.inner.lock().await;
        Ok(users.get(user_id).and_then(|funds| funds.get(fund_id)).cloned())
    }

    async fn put_fund(&self, user_id: &str, fund: &Fund) -> Result<()> {
        let mut users = self.inner.lock().await;
        debug!("Store PUT for {}/{}", user_id, fund.id);
        users
            .entry(user_id.to_string())
            .or_default()
            .insert(fund.id.clone(), fund.clone());
        Ok(())
    }

    async fn delete_fund(&self, user_id: &str, fund_id: &str) -> Result<()> {
        let mut users = self.inner.lock().await;
        if let Some(funds) = users.get_mut(user_id) {
            funds.remove(fund_id);
        }
        debug!("Store DELETE for {}/{}", user_id, fund_id);
        Ok(())
    }
}
