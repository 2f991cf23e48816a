//! IAM and SSM bindings against LocalStack via testcontainers
//!
//! Requires Docker, so every test is ignored by default:
//! `cargo test -p rotator-aws -- --ignored`

use pretty_assertions::assert_eq;
use rotator_aws::{AwsClientConfig, IamIdentityService, SsmParameterStore};
use rotator_credential::prelude::*;
use rotator_credential::ParameterType;
use secrecy::ExposeSecret;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::localstack::LocalStack;

const USER: &str = "rotator-test";

fn localstack_config(port: u16) -> AwsClientConfig {
    // LocalStack accepts any static credentials
    unsafe {
        std::env::set_var("AWS_ACCESS_KEY_ID", "test");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "test");
    }

    AwsClientConfig {
        region: Some("us-east-1".into()),
        endpoint_url: Some(format!("http://127.0.0.1:{port}")),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn iam_key_lifecycle() {
    let container = LocalStack::default()
        .start()
        .await
        .expect("Failed to start LocalStack");
    let port = container
        .get_host_port_ipv4(4566)
        .await
        .expect("Failed to get port");
    let config = localstack_config(port);

    let identity = IamIdentityService::from_config(&config).await.unwrap();
    identity
        .client()
        .create_user()
        .user_name(USER)
        .send()
        .await
        .expect("Failed to create user");

    assert!(identity.list_access_keys(USER).await.unwrap().is_empty());

    let created = identity.create_access_key(USER).await.unwrap();
    let listed = identity.list_access_keys(USER).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    identity.delete_access_key(USER, &created.id).await.unwrap();
    assert!(identity.list_access_keys(USER).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn ssm_missing_parameter_is_none() {
    let container = LocalStack::default()
        .start()
        .await
        .expect("Failed to start LocalStack");
    let port = container
        .get_host_port_ipv4(4566)
        .await
        .expect("Failed to get port");

    let store = SsmParameterStore::from_config(&localstack_config(port))
        .await
        .unwrap();

    assert!(store.get_parameter("/missing", true).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn full_rotation_into_parameter_store() {
    let container = LocalStack::default()
        .start()
        .await
        .expect("Failed to start LocalStack");
    let port = container
        .get_host_port_ipv4(4566)
        .await
        .expect("Failed to get port");
    let config = localstack_config(port);

    // GIVEN: A user and two provisioned slots
    let identity = IamIdentityService::from_config(&config).await.unwrap();
    identity
        .client()
        .create_user()
        .user_name(USER)
        .send()
        .await
        .expect("Failed to create user");

    let store = SsmParameterStore::from_config(&config).await.unwrap();
    store
        .put_parameter(ACCESS_KEY_ID, "seed", ParameterType::String)
        .await
        .unwrap();
    store
        .put_parameter(SECRET_ACCESS_KEY, "seed", ParameterType::SecureString)
        .await
        .unwrap();

    // WHEN: A rotation runs against an empty key set
    let source = IamKeySource::new(IamKeySourceConfig::new(USER), identity).unwrap();
    let sink = ParameterSink::new(store);
    let outcome = rotate(&source, &sink).await.unwrap();

    // THEN: The new key id landed in the slot with its type intact
    assert!(outcome.is_rotated());
    let keys = source.identity().list_access_keys(USER).await.unwrap();
    let slot = sink
        .store()
        .get_parameter(ACCESS_KEY_ID, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(slot.value.expose_secret(), keys[0].id);
    assert_eq!(slot.parameter_type, ParameterType::String);
    assert_eq!(slot.version, 2);

    let secret = sink
        .store()
        .get_parameter(SECRET_ACCESS_KEY, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secret.parameter_type, ParameterType::SecureString);
}
