//! SDK client configuration shared by every AWS-backed component

use rotator_credential::{ConfigError, ProviderConfig};
use serde::{Deserialize, Serialize};

/// Session name used when assuming a role and none is configured
pub const DEFAULT_SESSION_NAME: &str = "rotator";

/// How to build an AWS SDK client
///
/// All fields are optional. Anything left unset falls back to the SDK's
/// default provider chain (environment, shared profile, instance role).
///
/// # Example
///
/// ```rust
/// use rotator_aws::AwsClientConfig;
/// use rotator_credential::ProviderConfig;
///
/// let config = AwsClientConfig {
///     region: Some("us-west-2".into()),
///     role_arn: Some("arn:aws:iam::123456789012:role/rotator".into()),
///     ..Default::default()
/// };
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.session_name(), "rotator");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwsClientConfig {
    /// Region override (`AWS_REGION` / profile otherwise)
    pub region: Option<String>,

    /// Custom endpoint, e.g. `http://localhost:4566` for LocalStack
    pub endpoint_url: Option<String>,

    /// Role to assume on top of the base credentials
    pub role_arn: Option<String>,

    /// Session name for the assumed role
    pub session_name: Option<String>,
}

impl AwsClientConfig {
    /// Config pointing at a region
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Default::default()
        }
    }

    /// Effective session name for role assumption
    pub fn session_name(&self) -> &str {
        self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME)
    }
}

impl ProviderConfig for AwsClientConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "region".into(),
                    reason: "must not be blank".into(),
                });
            }
        }

        if let Some(endpoint) = &self.endpoint_url {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "endpoint_url".into(),
                    reason: format!("must start with http:// or https://, got {endpoint:?}"),
                });
            }
        }

        if let Some(arn) = &self.role_arn {
            if !arn.starts_with("arn:") {
                return Err(ConfigError::InvalidValue {
                    field: "role_arn".into(),
                    reason: format!("not an ARN: {arn:?}"),
                });
            }
        }

        if let Some(name) = &self.session_name {
            if self.role_arn.is_none() {
                return Err(ConfigError::ValidationFailed(
                    "session_name is only meaningful together with role_arn".into(),
                ));
            }
            validate_session_name(name)?;
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "AwsClient"
    }
}

// STS accepts 2-64 characters from [\w+=,.@-]
fn validate_session_name(name: &str) -> Result<(), ConfigError> {
    let len = name.chars().count();
    if !(2..=64).contains(&len) {
        return Err(ConfigError::InvalidValue {
            field: "session_name".into(),
            reason: format!("must be 2 to 64 characters, got {len}"),
        });
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || "_+=,.@-".contains(c);
    if let Some(bad) = name.chars().find(|&c| !allowed(c)) {
        return Err(ConfigError::InvalidValue {
            field: "session_name".into(),
            reason: format!("invalid character {bad:?}"),
        });
    }

    Ok(())
}
