//! In-memory sink
//!
//! Keeps the last value written under every key. Handy as a reference sink
//! in tests and for dry runs of a source.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};

use crate::core::{CredentialMap, SinkError};
use crate::traits::{Sink, SinkKind};

/// Sink that buffers credentials in process memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<BTreeMap<String, SecretString>>,
    write_count: AtomicU32,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .get(key)
            .map(|v| v.expose_secret().to_owned())
    }

    /// Keys written so far, in ascending order
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Number of `write` calls received
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write(&self, credentials: &CredentialMap) -> Result<(), SinkError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);

        let mut entries = self.entries.lock();
        for (key, value) in credentials.iter() {
            entries.insert(
                key.to_owned(),
                SecretString::from(value.expose_secret().to_owned()),
            );
        }
        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Memory
    }
}
