//! Parameter-store sink
//!
//! Writes each credential entry to the slot of the same name, keeping the
//! slot's existing type. Slots are provisioned out of band: an absent slot
//! means "not configured for rotation here" and is skipped with a warning,
//! never created.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::core::{CredentialMap, SinkError};
use crate::traits::{ParameterStore, Sink, SinkKind};

/// Persists credentials into existing parameter-store slots
#[derive(Debug)]
pub struct ParameterSink<S> {
    store: S,
}

impl<S: ParameterStore> ParameterSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Backend handle, mostly useful to inspect fakes in tests
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: ParameterStore> Sink for ParameterSink<S> {
    /// Entries are processed in key order. The first failing get or put
    /// aborts the remaining entries.
    #[tracing::instrument(skip_all, fields(sink = "aws_parameter_store", entries = credentials.len()))]
    async fn write(&self, credentials: &CredentialMap) -> Result<(), SinkError> {
        for (name, value) in credentials.iter() {
            let current = self
                .store
                .get_parameter(name, true)
                .await
                .map_err(|source| SinkError::GetParameter {
                    name: name.to_owned(),
                    source,
                })?;

            let Some(current) = current else {
                tracing::warn!(parameter = %name, "{name}: parameter not found, skipping rotation");
                continue;
            };

            let version = self
                .store
                .put_parameter(name, value.expose_secret(), current.parameter_type)
                .await
                .map_err(|source| SinkError::PutParameter {
                    name: name.to_owned(),
                    source,
                })?;

            tracing::info!(
                parameter = %name,
                previous_version = current.version,
                version,
                "Rotated parameter"
            );
        }

        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::AwsParameterStore
    }
}
