pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::FundStore;
use anyhow::Result;
use disk::DiskFundStore;
use std::sync::Arc;

/// Opens the on-disk fund store under the configured data directory.
pub fn open_fund_store(config: &AppConfig) -> Result<Arc<dyn FundStore>> {
    let path = config.default_data_path()?.join("funds");
    Ok(Arc::new(DiskFundStore::open(&path)?))
}
