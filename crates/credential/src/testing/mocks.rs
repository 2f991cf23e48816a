use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use secrecy::SecretString;

use crate::core::{AccessKey, AccessKeyMetadata, BoxError, Parameter, ParameterType};
use crate::rotation::policy::MAX_ACCESS_KEYS;
use crate::traits::{IdentityService, ParameterStore};

/// In-memory identity service with configurable failures.
///
/// Enforces the same two-key limit as the real service: creating a third key
/// for a user fails.
#[derive(Debug, Default)]
pub struct FakeIdentityService {
    keys: Mutex<BTreeMap<String, Vec<AccessKeyMetadata>>>,
    deleted: Mutex<Vec<String>>,
    next_id: AtomicU32,
    fail_on_list: AtomicBool,
    fail_on_delete: AtomicBool,
    fail_on_create: AtomicBool,
    list_count: AtomicU32,
    delete_count: AtomicU32,
    create_count: AtomicU32,
}

impl FakeIdentityService {
    /// Create a fake with no keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing key for `user_name`
    pub fn with_key(self, user_name: &str, id: &str, created_at: DateTime<Utc>) -> Self {
        self.insert_key(user_name, id, created_at);
        self
    }

    /// Seed an existing key for `user_name`, bypassing the two-key limit
    pub fn insert_key(&self, user_name: &str, id: &str, created_at: DateTime<Utc>) {
        self.keys
            .lock()
            .entry(user_name.to_owned())
            .or_default()
            .push(AccessKeyMetadata::new(id, created_at));
    }

    /// Keys currently held by `user_name`
    pub fn keys(&self, user_name: &str) -> Vec<AccessKeyMetadata> {
        self.keys.lock().get(user_name).cloned().unwrap_or_default()
    }

    /// Ids of every key deleted so far
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }

    /// Make next list fail
    pub fn fail_next_list(&self) {
        self.fail_on_list.store(true, Ordering::SeqCst);
    }

    /// Make next delete fail
    pub fn fail_next_delete(&self) {
        self.fail_on_delete.store(true, Ordering::SeqCst);
    }

    /// Make next create fail
    pub fn fail_next_create(&self) {
        self.fail_on_create.store(true, Ordering::SeqCst);
    }

    pub fn list_count(&self) -> u32 {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> u32 {
        self.delete_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> u32 {
        self.create_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn list_access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyMetadata>, BoxError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_list.swap(false, Ordering::SeqCst) {
            return Err("ServiceUnavailable: mock failure".into());
        }

        Ok(self.keys(user_name))
    }

    async fn delete_access_key(&self, user_name: &str, key_id: &str) -> Result<(), BoxError> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_delete.swap(false, Ordering::SeqCst) {
            return Err("AccessDenied: mock failure".into());
        }

        let mut keys = self.keys.lock();
        let held = keys.entry(user_name.to_owned()).or_default();
        let before = held.len();
        held.retain(|k| k.id != key_id);
        if held.len() == before {
            return Err(format!("NoSuchEntity: access key {key_id} not found").into());
        }

        self.deleted.lock().push(key_id.to_owned());
        Ok(())
    }

    async fn create_access_key(&self, user_name: &str) -> Result<AccessKey, BoxError> {
        self.create_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_create.swap(false, Ordering::SeqCst) {
            return Err("ServiceUnavailable: mock failure".into());
        }

        let mut keys = self.keys.lock();
        let held = keys.entry(user_name.to_owned()).or_default();
        if held.len() >= MAX_ACCESS_KEYS {
            return Err(format!(
                "LimitExceeded: cannot exceed quota for AccessKeysPerUser: {MAX_ACCESS_KEYS}"
            )
            .into());
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let key = AccessKey::new(format!("AKIAFAKE{n:012}"), format!("fake-secret-{n}"), Utc::now());
        held.push(key.metadata());
        Ok(key)
    }
}

#[derive(Debug)]
struct StoredParameter {
    value: String,
    parameter_type: ParameterType,
    version: i64,
    arn: String,
}

/// In-memory versioned parameter store with configurable failures
#[derive(Debug, Default)]
pub struct FakeParameterStore {
    params: Mutex<BTreeMap<String, StoredParameter>>,
    fail_puts_for: Mutex<BTreeSet<String>>,
    fail_on_get: AtomicBool,
    fail_on_put: AtomicBool,
    get_count: AtomicU32,
    put_count: AtomicU32,
}

impl FakeParameterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing slot at version 1
    pub fn with_parameter(self, name: &str, value: &str, parameter_type: ParameterType) -> Self {
        self.params.lock().insert(
            name.to_owned(),
            StoredParameter {
                value: value.to_owned(),
                parameter_type,
                version: 1,
                arn: Self::arn_for(name),
            },
        );
        self
    }

    fn arn_for(name: &str) -> String {
        let path = name.strip_prefix('/').unwrap_or(name);
        format!("arn:aws:ssm:us-west-2:123456789012:parameter/{path}")
    }

    /// Current value of `name`
    pub fn value(&self, name: &str) -> Option<String> {
        self.params.lock().get(name).map(|p| p.value.clone())
    }

    /// Current version of `name`
    pub fn version(&self, name: &str) -> Option<i64> {
        self.params.lock().get(name).map(|p| p.version)
    }

    /// Whether a slot called `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.params.lock().contains_key(name)
    }

    /// Make next get fail
    pub fn fail_next_get(&self) {
        self.fail_on_get.store(true, Ordering::SeqCst);
    }

    /// Make next put fail
    pub fn fail_next_put(&self) {
        self.fail_on_put.store(true, Ordering::SeqCst);
    }

    /// Make every put to `name` fail
    pub fn fail_puts_for(&self, name: &str) {
        self.fail_puts_for.lock().insert(name.to_owned());
    }

    pub fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> u32 {
        self.put_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for FakeParameterStore {
    async fn get_parameter(&self, name: &str, _decrypt: bool) -> Result<Option<Parameter>, BoxError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_get.swap(false, Ordering::SeqCst) {
            return Err("ThrottlingException: mock failure".into());
        }

        Ok(self.params.lock().get(name).map(|p| Parameter {
            name: name.to_owned(),
            value: SecretString::from(p.value.clone()),
            parameter_type: p.parameter_type,
            version: p.version,
            arn: p.arn.clone(),
        }))
    }

    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        parameter_type: ParameterType,
    ) -> Result<i64, BoxError> {
        self.put_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_put.swap(false, Ordering::SeqCst) || self.fail_puts_for.lock().contains(name)
        {
            return Err(format!("AccessDeniedException: not authorized to put {name}").into());
        }

        let mut params = self.params.lock();
        let entry = params
            .entry(name.to_owned())
            .or_insert_with(|| StoredParameter {
                value: String::new(),
                parameter_type,
                version: 0,
                arn: Self::arn_for(name),
            });
        entry.value = value.to_owned();
        entry.parameter_type = parameter_type;
        entry.version += 1;
        Ok(entry.version)
    }
}
