//! SDK config loading

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use rotator_credential::{ConfigError, ProviderConfig};

use crate::config::AwsClientConfig;

/// Errors raised while preparing an AWS client
#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    /// The client configuration was rejected
    #[error("invalid AWS client configuration: {0}")]
    Config(#[from] ConfigError),
}

fn base_loader(config: &AwsClientConfig) -> ConfigLoader {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader
}

/// Load an [`SdkConfig`] from the default chain plus the overrides in `config`
///
/// When `role_arn` is set, the base credentials are used to assume that role
/// and the returned config signs with the assumed-role session.
#[tracing::instrument(skip_all, fields(region = ?config.region, role = ?config.role_arn))]
pub async fn load_sdk_config(config: &AwsClientConfig) -> Result<SdkConfig, AwsError> {
    config.validate()?;

    let base = base_loader(config).load().await;

    let Some(role_arn) = &config.role_arn else {
        tracing::debug!("using default credential chain");
        return Ok(base);
    };

    let provider = AssumeRoleProvider::builder(role_arn.clone())
        .session_name(config.session_name())
        .configure(&base)
        .build()
        .await;

    tracing::debug!(session = config.session_name(), "assuming role");

    Ok(base_loader(config).credentials_provider(provider).load().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_config_fails_before_loading() {
        let config = AwsClientConfig {
            endpoint_url: Some("localhost".into()),
            ..Default::default()
        };

        let err = load_sdk_config(&config).await.unwrap_err();

        assert!(err.to_string().starts_with("invalid AWS client configuration"));
    }

    #[tokio::test]
    async fn region_override_is_applied() {
        let config = AwsClientConfig {
            region: Some("eu-north-1".into()),
            endpoint_url: Some("http://127.0.0.1:4566".into()),
            ..Default::default()
        };

        let sdk = load_sdk_config(&config).await.unwrap();

        assert_eq!(sdk.region().map(ToString::to_string).as_deref(), Some("eu-north-1"));
        assert_eq!(sdk.endpoint_url(), Some("http://127.0.0.1:4566"));
    }
}
