//! Credential sink trait

use std::fmt;

use async_trait::async_trait;

use crate::core::{CredentialMap, SinkError};

/// Identifies a sink implementation in logs and config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Parameter-store slots
    AwsParameterStore,
    /// In-process buffer
    Memory,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwsParameterStore => f.write_str("aws_parameter_store"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Persists a credential snapshot.
///
/// Every key of the map is treated as an independent named slot; a sink
/// makes no assumption about which keys a source emits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist every entry of `credentials`
    async fn write(&self, credentials: &CredentialMap) -> Result<(), SinkError>;

    /// Implementation kind, for logging
    fn kind(&self) -> SinkKind;
}
