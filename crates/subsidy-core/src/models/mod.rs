//! Data models: document grids, canonical records, reports and configuration.

pub mod config;
pub mod grid;
pub mod record;
pub mod report;
