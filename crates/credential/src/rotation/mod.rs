//! Rotation orchestration
//!
//! [`rotate`] reads one snapshot from a source and, when there is anything to
//! persist, hands it to a sink. [`Rotation`] does the same for a named secret
//! with several sinks, each with its own key-to-slot mapping.

mod error;
pub mod policy;

use std::collections::BTreeMap;

pub use error::{RotationError, RotationResult};

use crate::core::{CredentialMap, check_key_mapping};
use crate::providers::ConfigError;
use crate::traits::{Sink, Source};

/// Result of one rotation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The source had nothing new
    Unchanged,
    /// New credentials were issued and handed to every sink
    Rotated {
        /// Number of credential entries produced by the source
        keys: usize,
    },
}

impl RotationOutcome {
    pub fn is_rotated(&self) -> bool {
        matches!(self, Self::Rotated { .. })
    }
}

/// Read from `source` and persist any new credentials to `sink`.
///
/// An absent or empty snapshot is success with no action; the sink is not
/// called.
pub async fn rotate(source: &dyn Source, sink: &dyn Sink) -> RotationResult<RotationOutcome> {
    let Some(credentials) = read_non_empty(source).await? else {
        return Ok(RotationOutcome::Unchanged);
    };

    sink.write(&credentials).await?;
    Ok(RotationOutcome::Rotated {
        keys: credentials.len(),
    })
}

async fn read_non_empty(source: &dyn Source) -> RotationResult<Option<CredentialMap>> {
    Ok(source.read().await?.filter(|creds| !creds.is_empty()))
}

/// A sink plus the slot names its credential keys are written to
pub struct SinkBinding {
    sink: Box<dyn Sink>,
    key_to_name: BTreeMap<String, String>,
}

impl SinkBinding {
    /// Bind `sink` with keys written under their own names
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self {
            sink,
            key_to_name: BTreeMap::new(),
        }
    }

    /// Bind `sink` with keys renamed through `key_to_name`.
    ///
    /// Keys missing from a non-empty mapping are not written to this sink.
    /// Fails if two keys map to the same slot name.
    pub fn with_mapping(
        sink: Box<dyn Sink>,
        key_to_name: BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        check_key_mapping(&key_to_name)?;
        Ok(Self { sink, key_to_name })
    }

    pub fn key_to_name(&self) -> &BTreeMap<String, String> {
        &self.key_to_name
    }

    async fn write(&self, credentials: &CredentialMap) -> RotationResult<()> {
        let renamed = credentials.renamed(&self.key_to_name)?;
        if renamed.is_empty() {
            tracing::debug!(sink = %self.sink.kind(), "No mapped keys for sink, skipping");
            return Ok(());
        }
        self.sink.write(&renamed).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SinkBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkBinding")
            .field("sink", &self.sink.kind())
            .field("key_to_name", &self.key_to_name)
            .finish()
    }
}

/// A named secret: one source fanned out to one or more sinks
pub struct Rotation {
    name: String,
    source: Box<dyn Source>,
    sinks: Vec<SinkBinding>,
}

impl Rotation {
    pub fn new(name: impl Into<String>, source: Box<dyn Source>, sinks: Vec<SinkBinding>) -> Self {
        Self {
            name: name.into(),
            source,
            sinks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one pass. Sinks are written in order; the first failure stops the
    /// pass and later sinks are not written.
    #[tracing::instrument(skip(self), fields(secret = %self.name, source = %self.source.kind()))]
    pub async fn run(&self) -> RotationResult<RotationOutcome> {
        if self.sinks.is_empty() {
            return Err(RotationError::NoSinks {
                name: self.name.clone(),
            });
        }

        tracing::info!(sinks = self.sinks.len(), "Starting rotation");

        let Some(credentials) = read_non_empty(self.source.as_ref()).await? else {
            tracing::info!("Nothing to rotate");
            return Ok(RotationOutcome::Unchanged);
        };

        for binding in &self.sinks {
            binding.write(&credentials).await?;
        }

        tracing::info!(keys = credentials.len(), "Rotation complete");
        Ok(RotationOutcome::Rotated {
            keys: credentials.len(),
        })
    }
}

impl std::fmt::Debug for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rotation")
            .field("name", &self.name)
            .field("source", &self.source.kind())
            .field("sinks", &self.sinks)
            .finish()
    }
}
