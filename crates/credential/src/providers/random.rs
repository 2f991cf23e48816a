//! Random secret source
//!
//! Generates a new alphanumeric secret on every read. Useful for rotating
//! shared secrets (webhook tokens, internal passwords) that have no issuing
//! service of their own.

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::core::{CredentialMap, SourceError};
use crate::providers::config::{ConfigError, ProviderConfig};
use crate::traits::{Source, SourceKind};

/// Credential-map key used when none is configured
pub const DEFAULT_SECRET_KEY: &str = "secret";

/// Generated secret length when none is configured
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// Shortest secret the source will generate
pub const MIN_SECRET_LENGTH: usize = 16;

fn default_key() -> String {
    DEFAULT_SECRET_KEY.to_owned()
}

fn default_length() -> usize {
    DEFAULT_SECRET_LENGTH
}

/// Configuration for [`RandomSource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSourceConfig {
    /// Credential-map key the secret is emitted under
    #[serde(default = "default_key")]
    pub key: String,

    /// Number of alphanumeric characters
    #[serde(default = "default_length")]
    pub length: usize,
}

impl Default for RandomSourceConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            length: default_length(),
        }
    }
}

impl ProviderConfig for RandomSourceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "key".into(),
            });
        }

        if self.length < MIN_SECRET_LENGTH {
            return Err(ConfigError::InvalidValue {
                field: "length".into(),
                reason: format!(
                    "must be at least {MIN_SECRET_LENGTH} characters, got {}",
                    self.length
                ),
            });
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "RandomSource"
    }
}

/// Source that always rotates to a freshly generated secret
#[derive(Debug, Clone)]
pub struct RandomSource {
    config: RandomSourceConfig,
}

impl RandomSource {
    pub fn new(config: RandomSourceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.config.length)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl Source for RandomSource {
    async fn read(&self) -> Result<Option<CredentialMap>, SourceError> {
        let mut credentials = CredentialMap::new();
        credentials.insert(self.config.key.as_str(), self.generate());
        Ok(Some(credentials))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Random
    }
}
