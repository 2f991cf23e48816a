//! Credential map passed from a [`Source`](crate::traits::Source) to a
//! [`Sink`](crate::traits::Sink).

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::providers::ConfigError;

/// A snapshot of freshly issued credentials keyed by name.
///
/// Keys are a fixed vocabulary chosen by the producing source (for example
/// `accessKeyId` / `secretAccessKey`). Values are secrets and never appear in
/// `Debug` output.
#[derive(Default)]
pub struct CredentialMap {
    entries: BTreeMap<String, SecretString>,
}

impl CredentialMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(key.into(), SecretString::from(value.into()));
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.entries.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to persist
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key names in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretString)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Produce a copy whose keys are renamed through `key_to_name`.
    ///
    /// An empty mapping keeps every key as is. Otherwise only mapped keys are
    /// carried over; the rest are dropped. A mapping that sends two keys to
    /// the same name is rejected.
    pub fn renamed(&self, key_to_name: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        check_key_mapping(key_to_name)?;

        let mut out = Self::new();
        for (key, value) in &self.entries {
            let name = if key_to_name.is_empty() {
                Some(key)
            } else {
                key_to_name.get(key)
            };

            match name {
                Some(name) => {
                    out.entries.insert(
                        name.clone(),
                        SecretString::from(value.expose_secret().to_owned()),
                    );
                }
                None => tracing::debug!(key = %key, "No slot mapped for credential key, dropping"),
            }
        }
        Ok(out)
    }
}

/// Reject a key mapping in which two keys share a target name
pub fn check_key_mapping(key_to_name: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    let mut targets: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, name) in key_to_name {
        if let Some(previous) = targets.insert(name, key) {
            return Err(ConfigError::InvalidValue {
                field: "key_to_name".into(),
                reason: format!("'{previous}' and '{key}' both map to '{name}'"),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for CredentialMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for CredentialMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_output_hides_values() {
        let creds: CredentialMap = [("accessKeyId", "AKIAEXAMPLE"), ("secretAccessKey", "hunter2")]
            .into_iter()
            .collect();

        let rendered = format!("{creds:?}");
        assert!(rendered.contains("accessKeyId"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("AKIAEXAMPLE"));
    }

    #[test]
    fn renamed_with_empty_mapping_keeps_keys() {
        let creds: CredentialMap = [("a", "1"), ("b", "2")].into_iter().collect();
        let renamed = creds.renamed(&BTreeMap::new()).unwrap();

        assert_eq!(renamed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(renamed.get("b").map(|v| v.expose_secret()), Some("2"));
    }

    #[test]
    fn renamed_drops_unmapped_keys() {
        let creds: CredentialMap = [("accessKeyId", "id"), ("secretAccessKey", "secret")]
            .into_iter()
            .collect();
        let mapping = BTreeMap::from([("secretAccessKey".to_string(), "/ci/secret".to_string())]);

        let renamed = creds.renamed(&mapping).unwrap();

        assert_eq!(renamed.len(), 1);
        assert_eq!(
            renamed.get("/ci/secret").map(|v| v.expose_secret()),
            Some("secret")
        );
        assert!(!renamed.contains_key("accessKeyId"));
    }

    #[test]
    fn renamed_rejects_two_keys_on_one_name() {
        let creds: CredentialMap = [("accessKeyId", "AKIA1"), ("secretAccessKey", "s3cr3t")]
            .into_iter()
            .collect();
        let mapping = BTreeMap::from([
            ("accessKeyId".to_string(), "/x".to_string()),
            ("secretAccessKey".to_string(), "/x".to_string()),
        ]);

        let err = creds.renamed(&mapping).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "key_to_name"));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: key_to_name: 'accessKeyId' and 'secretAccessKey' both map to '/x'"
        );
    }
}
