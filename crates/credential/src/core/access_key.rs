//! Access-key records held by an identity-service principal

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Metadata returned when listing a principal's access keys.
///
/// The secret half of a key is only ever available at creation time, so a
/// listing carries just the id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyMetadata {
    /// Access-key id (e.g. `AKIA...`)
    pub id: String,
    /// When the identity service issued the key
    pub created_at: DateTime<Utc>,
}

impl AccessKeyMetadata {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}

/// A freshly created access key, including its secret.
pub struct AccessKey {
    /// Access-key id
    pub id: String,
    /// Secret access key
    pub secret: SecretString,
    /// When the identity service issued the key
    pub created_at: DateTime<Utc>,
}

impl AccessKey {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::from(secret.into()),
            created_at,
        }
    }

    /// Listing view of this key
    pub fn metadata(&self) -> AccessKeyMetadata {
        AccessKeyMetadata::new(self.id.clone(), self.created_at)
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
