//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod fund;
pub mod history;
pub mod log;
pub mod nav;
pub mod portfolio;
pub mod projection;
pub mod reconcile;
pub mod report;
pub mod store;

// Re-export main types for cleaner imports
pub use error::{PortfolioError, PortfolioResult};
pub use fund::{Fund, ResolvedNav};
pub use nav::{NavProvider, NavQuote, RawNavPoint};
pub use portfolio::Portfolio;
pub use store::FundStore;
