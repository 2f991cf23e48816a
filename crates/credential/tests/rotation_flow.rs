//! End-to-end rotation over fake backends: identity service → parameter store

use std::collections::BTreeMap;

use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use rotator_credential::prelude::*;
use rotator_credential::testing::{FakeIdentityService, FakeParameterStore};
use rotator_credential::ParameterType;

const USER: &str = "ci-deployer";
const ID_SLOT: &str = "/ci/aws_access_key_id";
const SECRET_SLOT: &str = "/ci/aws_secret_access_key";

fn slots() -> FakeParameterStore {
    FakeParameterStore::new()
        .with_parameter(ID_SLOT, "AKIAPREVIOUS", ParameterType::String)
        .with_parameter(SECRET_SLOT, "previous", ParameterType::SecureString)
}

fn mapping() -> BTreeMap<String, String> {
    BTreeMap::from([
        (ACCESS_KEY_ID.to_string(), ID_SLOT.to_string()),
        (SECRET_ACCESS_KEY.to_string(), SECRET_SLOT.to_string()),
    ])
}

#[tokio::test]
async fn rotate_publishes_new_key_under_its_own_names() {
    let source = IamKeySource::new(IamKeySourceConfig::new(USER), FakeIdentityService::new()).unwrap();
    let sink = MemorySink::new();

    let outcome = rotate(&source, &sink).await.unwrap();

    assert_eq!(outcome, RotationOutcome::Rotated { keys: 2 });
    let held = source.identity().keys(USER);
    assert_eq!(sink.get(ACCESS_KEY_ID), Some(held[0].id.clone()));
    assert!(sink.get(SECRET_ACCESS_KEY).is_some());
}

#[tokio::test]
async fn rotate_with_fresh_keys_writes_nothing() {
    let identity = FakeIdentityService::new()
        .with_key(USER, "AKIA1", Utc::now() - TimeDelta::minutes(20))
        .with_key(USER, "AKIA2", Utc::now() - TimeDelta::minutes(10));
    let source = IamKeySource::new(IamKeySourceConfig::new(USER), identity).unwrap();
    let sink = MemorySink::new();

    let outcome = rotate(&source, &sink).await.unwrap();

    assert_eq!(outcome, RotationOutcome::Unchanged);
    assert_eq!(sink.write_count(), 0);
}

#[tokio::test]
async fn rotation_maps_keys_to_parameter_slots() {
    // GIVEN: A stale key pair and two provisioned slots
    let identity = FakeIdentityService::new()
        .with_key(USER, "AKIAPREVIOUS", Utc::now() - TimeDelta::minutes(30))
        .with_key(USER, "AKIASTALE", Utc::now() - TimeDelta::minutes(400));
    let source = IamKeySource::new(IamKeySourceConfig::new(USER), identity).unwrap();

    let store = std::sync::Arc::new(slots());
    let rotation = Rotation::new(
        "ci-deployer",
        Box::new(source),
        vec![SinkBinding::with_mapping(
            Box::new(ParameterSink::new(SharedStore(store.clone()))),
            mapping(),
        )
        .unwrap()],
    );

    // WHEN: The rotation runs
    let outcome = rotation.run().await.unwrap();

    // THEN: Both slots hold the new key and were bumped once
    assert!(outcome.is_rotated());
    let new_id = store.value(ID_SLOT).unwrap();
    assert!(new_id.starts_with("AKIAFAKE"));
    assert!(store.value(SECRET_SLOT).unwrap().starts_with("fake-secret-"));
    assert_eq!(store.version(ID_SLOT), Some(2));
    assert_eq!(store.version(SECRET_SLOT), Some(2));
    assert_eq!(store.put_count(), 2);
}

#[tokio::test]
async fn unprovisioned_slots_are_skipped_without_failing() {
    let source = IamKeySource::new(IamKeySourceConfig::new(USER), FakeIdentityService::new()).unwrap();
    let store = std::sync::Arc::new(FakeParameterStore::new());
    let rotation = Rotation::new(
        "ci-deployer",
        Box::new(source),
        vec![SinkBinding::with_mapping(
            Box::new(ParameterSink::new(SharedStore(store.clone()))),
            mapping(),
        )
        .unwrap()],
    );

    let outcome = rotation.run().await.unwrap();

    assert!(outcome.is_rotated());
    assert_eq!(store.put_count(), 0);
    assert_eq!(store.get_count(), 2);
}

/// Lets the test keep a handle on the store after the sink takes ownership
struct SharedStore(std::sync::Arc<FakeParameterStore>);

#[async_trait::async_trait]
impl ParameterStore for SharedStore {
    async fn get_parameter(
        &self,
        name: &str,
        decrypt: bool,
    ) -> Result<Option<rotator_credential::Parameter>, rotator_credential::BoxError> {
        self.0.get_parameter(name, decrypt).await
    }

    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        parameter_type: ParameterType,
    ) -> Result<i64, rotator_credential::BoxError> {
        self.0.put_parameter(name, value, parameter_type).await
    }
}
