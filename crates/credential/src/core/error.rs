//! Error types for sources and sinks
//!
//! Service failures carry the failing operation and the principal or slot it
//! targeted. Inconsistent external state gets its own variant so callers can
//! tell it apart from an ordinary outage.

use thiserror::Error;

/// Boxed error returned by a backend (SDK client, fake, ...)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while producing new credentials
#[derive(Debug, Error)]
pub enum SourceError {
    /// Listing the principal's access keys failed
    #[error("unable to list access keys for {user_name}: {source}")]
    ListKeys {
        user_name: String,
        #[source]
        source: BoxError,
    },

    /// Deleting the expired access key failed
    #[error("unable to delete older access key {key_id} for {user_name}: {source}")]
    DeleteKey {
        user_name: String,
        key_id: String,
        #[source]
        source: BoxError,
    },

    /// Creating the replacement access key failed
    #[error("unable to create new access key for {user_name}: {source}")]
    CreateKey {
        user_name: String,
        #[source]
        source: BoxError,
    },

    /// The identity service reported a key count outside the 0..=2 range
    #[error("inconsistent identity state: {user_name} holds {count} access keys, at most 2 expected")]
    UnexpectedKeyCount { user_name: String, count: usize },
}

/// Errors raised while persisting credentials
#[derive(Debug, Error)]
pub enum SinkError {
    /// Reading the current slot failed for a reason other than absence
    #[error("unable to get parameter {name}: {source}")]
    GetParameter {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Writing the new value to an existing slot failed
    #[error("unable to put parameter {name}: {source}")]
    PutParameter {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Failure of a sink with no backend-specific variant here
    #[error("sink failed: {0}")]
    Other(String),
}
