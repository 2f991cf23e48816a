//! Rotator AWS - SDK bindings for the rotation backends
//!
//! Implements [`rotator_credential::IdentityService`] over IAM and
//! [`rotator_credential::ParameterStore`] over SSM Parameter Store.
//!
//! ```rust,ignore
//! use rotator_aws::{AwsClientConfig, IamIdentityService, SsmParameterStore};
//! use rotator_credential::prelude::*;
//!
//! let aws = AwsClientConfig::with_region("us-west-2");
//! let source = IamKeySource::new(
//!     IamKeySourceConfig::new("ci-deployer"),
//!     IamIdentityService::from_config(&aws).await?,
//! )?;
//! let sink = ParameterSink::new(SsmParameterStore::from_config(&aws).await?);
//! ```
#![forbid(unsafe_code)]

mod client;
mod config;
mod iam;
mod ssm;

pub use client::{AwsError, load_sdk_config};
pub use config::{AwsClientConfig, DEFAULT_SESSION_NAME};
pub use iam::IamIdentityService;
pub use ssm::SsmParameterStore;
