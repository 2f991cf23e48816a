//! Provider configuration trait and error types

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    #[error("Missing required configuration: {field}")]
    MissingRequired { field: String },

    /// Configuration validation failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Trait for source, sink and client configuration
///
/// Every config is validated before the component it configures is built.
///
/// # Contract
///
/// - `validate()` checks all parameters and returns an error naming the
///   offending field and what is wrong with it
/// - `provider_name()` returns a static string identifying the component
///   for logging
///
/// # Example
///
/// ```rust
/// use rotator_credential::providers::{ConfigError, IamKeySourceConfig, ProviderConfig};
///
/// let config = IamKeySourceConfig::new("ci-deployer");
/// assert!(config.validate().is_ok());
///
/// let empty = IamKeySourceConfig::new("");
/// assert!(matches!(empty.validate(), Err(ConfigError::MissingRequired { .. })));
/// ```
pub trait ProviderConfig: Send + Sync + Clone {
    /// Validate configuration parameters
    fn validate(&self) -> Result<(), ConfigError>;

    /// Component name for logging (e.g. "AwsIamKeySource")
    fn provider_name(&self) -> &'static str;
}
