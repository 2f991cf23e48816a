//! # Rotator Log
//!
//! Installs a `tracing` subscriber for the rotator binaries.
//!
//! ```rust,no_run
//! fn main() -> Result<(), rotator_log::LogError> {
//!     rotator_log::init_with(rotator_log::Config::from_env())?;
//!
//!     tracing::info!(secret = "ci-deployer", "starting rotation");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

mod builder;
mod config;

pub use builder::LoggerBuilder;
pub use config::{Config, DisplayConfig, Format, WriterConfig};

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logger operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Filter directives did not parse
    #[error("Invalid filter: {0}")]
    Filter(String),

    /// Subscriber could not be installed
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber for `config`
pub fn init_with(config: Config) -> LogResult<()> {
    LoggerBuilder::from_config(config).build()
}
