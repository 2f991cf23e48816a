//! Identity-service access-key source
//!
//! Keeps a principal at two access keys: the one currently published and its
//! successor. Each call lists the principal's keys and
//!
//! - with fewer than two keys, issues a new one;
//! - with two keys, deletes the older one once it is past `max_age` and issues
//!   a replacement, otherwise does nothing.
//!
//! # Configuration
//!
//! ```rust
//! use rotator_credential::providers::{IamKeySourceConfig, DEFAULT_MAX_AGE};
//! use std::time::Duration;
//!
//! let config = IamKeySourceConfig {
//!     user_name: "ci-deployer".into(),
//!     max_age: Duration::from_secs(4 * 3600),
//! };
//! assert!(config.max_age > DEFAULT_MAX_AGE);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::core::{AccessKey, CredentialMap, SourceError};
use crate::providers::config::{ConfigError, ProviderConfig};
use crate::rotation::policy::{self, KeyAction};
use crate::traits::{IdentityService, Source, SourceKind};

/// Credential-map key holding the access-key id
pub const ACCESS_KEY_ID: &str = "accessKeyId";

/// Credential-map key holding the secret access key
pub const SECRET_ACCESS_KEY: &str = "secretAccessKey";

/// Age past which the older of two access keys is replaced
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(100 * 60);

fn default_max_age() -> Duration {
    DEFAULT_MAX_AGE
}

/// Configuration for [`IamKeySource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamKeySourceConfig {
    /// Principal whose access keys are rotated
    pub user_name: String,

    /// Staleness threshold for the older key
    #[serde(default = "default_max_age", with = "humantime_serde")]
    pub max_age: Duration,
}

impl IamKeySourceConfig {
    /// Config for `user_name` with the default max-age
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl ProviderConfig for IamKeySourceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.user_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "user_name".into(),
            });
        }

        if self.max_age.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "max_age".into(),
                reason: "must be greater than zero".into(),
            });
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "AwsIamKeySource"
    }
}

/// Rotates a principal's access keys through an [`IdentityService`]
#[derive(Debug)]
pub struct IamKeySource<I> {
    config: IamKeySourceConfig,
    identity: I,
}

impl<I: IdentityService> IamKeySource<I> {
    /// Build a source after validating `config`
    pub fn new(config: IamKeySourceConfig, identity: I) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, identity })
    }

    pub fn config(&self) -> &IamKeySourceConfig {
        &self.config
    }

    /// Backend handle, mostly useful to inspect fakes in tests
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Run one rotation pass as of `now`.
    ///
    /// Returns the newly created key, or `None` when both held keys are still
    /// within max-age.
    #[tracing::instrument(skip(self), fields(user_name = %self.config.user_name))]
    pub async fn rotate_keys_at(&self, now: DateTime<Utc>) -> Result<Option<AccessKey>, SourceError> {
        let user_name = self.config.user_name.as_str();

        let keys = self
            .identity
            .list_access_keys(user_name)
            .await
            .map_err(|source| SourceError::ListKeys {
                user_name: user_name.to_owned(),
                source,
            })?;

        match policy::plan(&keys, now, self.config.max_age) {
            KeyAction::Keep => {
                tracing::debug!(held = keys.len(), "Access keys within max age, nothing to rotate");
                return Ok(None);
            }
            KeyAction::Inconsistent { count } => {
                return Err(SourceError::UnexpectedKeyCount {
                    user_name: user_name.to_owned(),
                    count,
                });
            }
            KeyAction::Replace { expired } => {
                self.identity
                    .delete_access_key(user_name, &expired.id)
                    .await
                    .map_err(|source| SourceError::DeleteKey {
                        user_name: user_name.to_owned(),
                        key_id: expired.id.clone(),
                        source,
                    })?;
                tracing::info!(key_id = %expired.id, created_at = %expired.created_at, "Deleted expired access key");
            }
            KeyAction::Create => {}
        }

        let key = self
            .identity
            .create_access_key(user_name)
            .await
            .map_err(|source| SourceError::CreateKey {
                user_name: user_name.to_owned(),
                source,
            })?;
        tracing::info!(key_id = %key.id, "Created access key");

        Ok(Some(key))
    }
}

#[async_trait]
impl<I: IdentityService> Source for IamKeySource<I> {
    async fn read(&self) -> Result<Option<CredentialMap>, SourceError> {
        let Some(key) = self.rotate_keys_at(Utc::now()).await? else {
            return Ok(None);
        };

        let mut credentials = CredentialMap::new();
        credentials.insert(ACCESS_KEY_ID, key.id.as_str());
        credentials.insert(SECRET_ACCESS_KEY, key.secret.expose_secret());
        Ok(Some(credentials))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::AwsIam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_defaults_max_age() {
        let config: IamKeySourceConfig =
            serde_json::from_str(r#"{"user_name": "ci-deployer"}"#).unwrap();
        assert_eq!(config, IamKeySourceConfig::new("ci-deployer"));
        assert_eq!(config.max_age, Duration::from_secs(6000));
    }

    #[test]
    fn config_parses_humantime_max_age() {
        let config: IamKeySourceConfig =
            serde_json::from_str(r#"{"user_name": "ci-deployer", "max_age": "2h 30m"}"#).unwrap();
        assert_eq!(config.max_age, Duration::from_secs(9000));
    }

    #[test]
    fn config_rejects_zero_max_age() {
        let config = IamKeySourceConfig {
            user_name: "ci-deployer".into(),
            max_age: Duration::ZERO,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "max_age"
        ));
    }

    #[test]
    fn config_rejects_blank_user() {
        assert!(matches!(
            IamKeySourceConfig::new("  ").validate(),
            Err(ConfigError::MissingRequired { field }) if field == "user_name"
        ));
    }
}
