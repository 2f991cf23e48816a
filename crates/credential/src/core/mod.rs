//! Core types for credential rotation

mod access_key;
mod credentials;
mod error;
mod parameter;

pub use access_key::{AccessKey, AccessKeyMetadata};
pub use credentials::{CredentialMap, check_key_mapping};
pub use error::{BoxError, SinkError, SourceError};
pub use parameter::{Parameter, ParameterType};
