//! Data models and structures for the connectivity tester

pub mod config;
pub mod result;

// Re-export main model types
pub use config::{Config, ProbeConfig, RunLabels};
pub use result::{ProbeResult, ZoneStat};
