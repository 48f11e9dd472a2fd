use crate::core::fund::Fund;
use crate::core::store::FundStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const FUNDS_PARTITION: &str = "funds";

/// Fund store backed by a fjall keyspace. All users share one partition;
/// keys are `<len(user_id)>:<user_id>/<fund_id>` and values are JSON encoded
/// funds. The length prefix keeps a user's scan from reaching another user
/// whose id merely starts with the same characters.
pub struct DiskFundStore {
    keyspace: Keyspace,
    funds: PartitionHandle,
}

impl DiskFundStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open fund store at {}", path.display()))?;
        let funds = keyspace
            .open_partition(FUNDS_PARTITION, PartitionCreateOptions::default())
            .context("Failed to open funds partition")?;
        debug!("Opened fund store at {}", path.display());

        Ok(Self { keyspace, funds })
    }

    fn user_prefix(user_id: &str) -> String {
        format!("{}:{user_id}/", user_id.len())
    }

    fn key(user_id: &str, fund_id: &str) -> String {
        format!("{}{fund_id}", Self::user_prefix(user_id))
    }
}

#[async_trait]
impl FundStore for DiskFundStore {
    async fn list_funds(&self, user_id: &str) -> Result<Vec<Fund>> {
        let prefix = Self::user_prefix(user_id);
        let mut funds = Vec::new();
        for item in self.funds.prefix(prefix.as_bytes()) {
            let (key, value) = item.context("Failed to read fund store")?;
            let fund: Fund = serde_json::from_slice(&value).with_context(|| {
                format!(
                    "Failed to decode fund record '{}'",
                    String::from_utf8_lossy(&key)
                )
            })?;
            funds.push(fund);
        }
        debug!("Loaded {} fund(s) for user {}", funds.len(), user_id);
        Ok(funds)
    }

    async fn get_fund(&self, user_id: &str, fund_id: &str) -> Result<Option<Fund>> {
        let key = Self::key(user_id, fund_id);
        match self.funds.get(key.as_bytes())? {
            Some(value) => Ok(Some(
                serde_json::from_slice(&value)
                    .with_context(|| format!("Failed to decode fund record '{key}'"))?,
            )),
            None => Ok(None),
        }
    }

    async fn put_fund(&self, user_id: &str, fund: &Fund) -> Result<()> {
        let key = Self::key(user_id, &fund.id);
        self.funds
            .insert(key.as_bytes(), serde_json::to_vec(fund)?)
            .with_context(|| format!("Failed to write fund record '{key}'"))?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for {}", key);
        Ok(())
    }

    async fn delete_fund(&self, user_id: &str, fund_id: &str) -> Result<()> {
        let key = Self::key(user_id, fund_id);
        self.funds
            .remove(key.as_bytes())
            .with_context(|| format!("Failed to delete fund record '{key}'"))?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store DELETE for {}", key);
        Ok(())
    }
}
