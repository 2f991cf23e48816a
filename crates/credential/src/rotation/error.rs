//! Orchestration errors

use thiserror::Error;

use crate::core::{SinkError, SourceError};
use crate::providers::ConfigError;

/// Errors returned by a rotation pass
///
/// Source and sink failures are passed through as raised; they already
/// carry the failing operation and target.
#[derive(Debug, Error)]
pub enum RotationError {
    /// Producing new credentials failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Persisting new credentials failed
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A sink's key mapping sends two keys to the same slot
    #[error(transparent)]
    Mapping(#[from] ConfigError),

    /// A rotation was assembled without any sink
    #[error("rotation {name} has no sinks configured")]
    NoSinks { name: String },
}

/// Result type for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;
