//! Persistence abstraction for fund records

use crate::core::fund::Fund;
use anyhow::Result;
use async_trait::async_trait;

/// Per-user fund collection. Writes for different funds are independent;
/// nothing here is transactional across funds.
#[async_trait]
pub trait FundStore: Send + Sync {
    async fn list_funds(&self, user_id: &str) -> Result<Vec<Fund>>;

    async fn get_fund(&self, user_id: &str, fund_id: &str) -> Result<Option<Fund>>;

    /// Inserts or replaces the fund keyed by `fund.id`.
    async fn put_fund(&self, user_id: &str, fund: &Fund) -> Result<()>;

    async fn delete_fund(&self, user_id: &str, fund_id: &str) -> Result<()>;
}
