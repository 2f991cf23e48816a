//! Backend service seams
//!
//! Sources and sinks talk to external services only through these traits.
//! `rotator-aws` implements them over the AWS SDK; the `testing` module
//! provides in-memory fakes.

use async_trait::async_trait;

use crate::core::{AccessKey, AccessKeyMetadata, BoxError, Parameter, ParameterType};

/// Identity service that issues access keys to a principal
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// List every access key currently held by `user_name`
    async fn list_access_keys(&self, user_name: &str)
    -> Result<Vec<AccessKeyMetadata>, BoxError>;

    /// Delete the access key `key_id` of `user_name`
    async fn delete_access_key(&self, user_name: &str, key_id: &str) -> Result<(), BoxError>;

    /// Issue a new access key for `user_name`
    async fn create_access_key(&self, user_name: &str) -> Result<AccessKey, BoxError>;
}

/// Durable, versioned key/value parameter store
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the slot `name`; `Ok(None)` when no such slot exists
    async fn get_parameter(&self, name: &str, decrypt: bool)
    -> Result<Option<Parameter>, BoxError>;

    /// Overwrite the slot `name`, returning the new version
    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        parameter_type: ParameterType,
    ) -> Result<i64, BoxError>;
}
