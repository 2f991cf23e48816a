//! Rotator Credential - access-key rotation core
//!
//! Rotates short-lived credentials issued by an identity service and
//! republishes them to a durable parameter store.
//!
//! # Building blocks
//!
//! - **Sources** ([`Source`]) issue at most one fresh credential snapshot per
//!   call and own the rotation preconditions ([`IamKeySource`],
//!   [`RandomSource`])
//! - **Sinks** ([`Sink`]) persist a snapshot to named slots, skipping slots
//!   that do not exist ([`ParameterSink`], [`MemorySink`])
//! - **Orchestration** ([`rotate`], [`Rotation`]) wires a source to its sinks
//! - **Backends** ([`IdentityService`], [`ParameterStore`]) are the seams to
//!   the external services; `rotator-aws` implements them over the AWS SDK
//!
//! # Example
//!
//! ```rust
//! use rotator_credential::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RandomSource::new(RandomSourceConfig::default())?;
//! let sink = MemorySink::new();
//!
//! let outcome = rotate(&source, &sink).await?;
//! assert!(outcome.is_rotated());
//! assert!(sink.get("secret").is_some());
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

/// Core types and errors
pub mod core;
/// Source and sink implementations
pub mod providers;
/// Rotation decision and orchestration
pub mod rotation;
/// Source, sink and backend traits
pub mod traits;

/// In-memory fakes and log capture for tests
#[cfg(feature = "test-util")]
pub mod testing;

// ── Root re-exports ─────────────────────────────────────────────────────────

pub use crate::core::{
    AccessKey, AccessKeyMetadata, BoxError, CredentialMap, Parameter, ParameterType, SinkError,
    SourceError, check_key_mapping,
};
pub use crate::providers::{
    ConfigError, IamKeySource, IamKeySourceConfig, MemorySink, ParameterSink, ProviderConfig,
    RandomSource, RandomSourceConfig,
};
pub use crate::rotation::{
    Rotation, RotationError, RotationOutcome, RotationResult, SinkBinding, rotate,
};
pub use crate::traits::{IdentityService, ParameterStore, Sink, SinkKind, Source, SourceKind};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::core::{CredentialMap, SinkError, SourceError};
    pub use crate::providers::{
        ACCESS_KEY_ID, ConfigError, DEFAULT_MAX_AGE, IamKeySource, IamKeySourceConfig, MemorySink,
        ParameterSink, ProviderConfig, RandomSource, RandomSourceConfig, SECRET_ACCESS_KEY,
    };
    pub use crate::rotation::{
        Rotation, RotationError, RotationOutcome, RotationResult, SinkBinding, rotate,
    };
    pub use crate::traits::{IdentityService, ParameterStore, Sink, Source};
}
