//! Terminal front end for portfolio operations

pub mod funds;
pub mod history;
pub mod projection;
pub mod refresh;
pub mod report;
pub mod setup;
pub mod ui;
