//! Credential source trait

use std::fmt;

use async_trait::async_trait;

use crate::core::{CredentialMap, SourceError};

/// Identifies a source implementation in logs and config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Identity-service access-key rotation
    AwsIam,
    /// Randomly generated secret
    Random,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwsIam => f.write_str("aws_iam"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Produces at most one fresh credential snapshot per call.
///
/// A source owns the preconditions for rotating: it decides whether new
/// credentials are due and, if so, issues them. `Ok(None)` (or an empty
/// map) means there is nothing to rotate this cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Source: Send + Sync {
    /// Issue new credentials if rotation is due
    async fn read(&self) -> Result<Option<CredentialMap>, SourceError>;

    /// Implementation kind, for logging
    fn kind(&self) -> SourceKind;
}
