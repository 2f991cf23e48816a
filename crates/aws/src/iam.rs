//! IAM-backed [`IdentityService`]

use async_trait::async_trait;
use aws_sdk_iam::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use chrono::{DateTime, Utc};
use rotator_credential::{AccessKey, AccessKeyMetadata, BoxError, IdentityService};

use crate::client::{AwsError, load_sdk_config};
use crate::config::AwsClientConfig;

/// Access-key operations against AWS IAM
#[derive(Clone, Debug)]
pub struct IamIdentityService {
    client: Client,
}

impl IamIdentityService {
    /// Wrap an existing SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from [`AwsClientConfig`]
    pub async fn from_config(config: &AwsClientConfig) -> Result<Self, AwsError> {
        let sdk = load_sdk_config(config).await?;
        Ok(Self::new(Client::new(&sdk)))
    }

    /// Underlying SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn to_chrono(value: &aws_smithy_types::DateTime) -> Result<DateTime<Utc>, BoxError> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
        .ok_or_else(|| format!("timestamp out of range: {value:?}").into())
}

fn sdk_error(err: impl std::error::Error + Send + Sync + 'static) -> BoxError {
    DisplayErrorContext(err).to_string().into()
}

#[async_trait]
impl IdentityService for IamIdentityService {
    #[tracing::instrument(skip(self), fields(service = "iam"))]
    async fn list_access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyMetadata>, BoxError> {
        let mut keys = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .list_access_keys()
                .user_name(user_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(sdk_error)?;

            for meta in page.access_key_metadata() {
                let id = meta
                    .access_key_id()
                    .ok_or("access key metadata without an id")?;
                let created = meta
                    .create_date()
                    .ok_or_else(|| format!("access key {id} has no creation date"))?;
                keys.push(AccessKeyMetadata::new(id, to_chrono(created)?));
            }

            match page.marker() {
                Some(next) if page.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::debug!(count = keys.len(), "listed access keys");
        Ok(keys)
    }

    #[tracing::instrument(skip(self), fields(service = "iam"))]
    async fn delete_access_key(&self, user_name: &str, key_id: &str) -> Result<(), BoxError> {
        self.client
            .delete_access_key()
            .user_name(user_name)
            .access_key_id(key_id)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(service = "iam"))]
    async fn create_access_key(&self, user_name: &str) -> Result<AccessKey, BoxError> {
        let output = self
            .client
            .create_access_key()
            .user_name(user_name)
            .send()
            .await
            .map_err(sdk_error)?;

        let key = output
            .access_key()
            .ok_or("create access key response carried no key")?;
        let created_at = match key.create_date() {
            Some(date) => to_chrono(date)?,
            None => Utc::now(),
        };

        Ok(AccessKey::new(
            key.access_key_id(),
            key.secret_access_key(),
            created_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_smithy_timestamps() {
        let smithy = aws_smithy_types::DateTime::from_secs_and_nanos(1_700_000_000, 250);
        let converted = to_chrono(&smithy).unwrap();
        assert_eq!(converted.timestamp(), 1_700_000_000);
        assert_eq!(converted.timestamp_subsec_nanos(), 250);
    }
}
