//! kitscope-core: equipment records, configuration, CSV storage.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{AppConfig, LoggingConfig, MatchStrategy, MatchingConfig, OutputConfig};
pub use error::{ExitCode, KitscopeError, Result};
pub use models::*;
