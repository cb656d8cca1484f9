//! Provisioning flows against the in-memory cloud

use std::sync::Arc;

use cloudforge_cloud::{
    CloudClient, IdentityProvisioner, InMemoryCloud, Operation, PolicyScope, RemoteErrorKind,
    StorageProvisioner,
};

const ALLOW_ALL: &str = r#"{"Version": "2012-10-17", "Statement": [{"Effect": "Allow", "Action": "*", "Resource": "*"}]}"#;

fn identities(cloud: &InMemoryCloud) -> IdentityProvisioner {
    IdentityProvisioner::new(Arc::new(cloud.clone()), cloud.account_id())
}

fn storage(cloud: &InMemoryCloud) -> StorageProvisioner {
    StorageProvisioner::new(Arc::new(cloud.clone()))
}

#[tokio::test]
async fn test_user_creation() {
    let cloud = InMemoryCloud::new();

    identities(&cloud)
        .ensure_user("test-cloudforge-user")
        .await
        .unwrap();

    let users = cloud.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "test-cloudforge-user");
}

#[tokio::test]
async fn test_user_is_idempotent() {
    let cloud = InMemoryCloud::new();
    let identities = identities(&cloud);

    let first = identities.ensure_user("cloudforge-user").await.unwrap();
    let second = identities.ensure_user("cloudforge-user").await.unwrap();

    assert_eq!(first.resource.arn, second.resource.arn);
    assert!(first.is_created());
    assert!(!second.is_created());
    assert_eq!(cloud.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_policy_creation() {
    let cloud = InMemoryCloud::new();

    identities(&cloud)
        .ensure_policy("TestPolicy", ALLOW_ALL)
        .await
        .unwrap();

    let policies = cloud.list_policies(PolicyScope::Local).await.unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name, "TestPolicy");
}

#[tokio::test]
async fn test_policy_keeps_document_verbatim() {
    let cloud = InMemoryCloud::new();

    let ensured = identities(&cloud)
        .ensure_policy("TestPolicy", ALLOW_ALL)
        .await
        .unwrap();

    assert_eq!(ensured.resource.document.as_deref(), Some(ALLOW_ALL));
}

#[tokio::test]
async fn test_policy_is_idempotent() {
    let cloud = InMemoryCloud::new();
    let identities = identities(&cloud);

    let first = identities.ensure_policy("TestPolicy", ALLOW_ALL).await.unwrap();
    let second = identities.ensure_policy("TestPolicy", ALLOW_ALL).await.unwrap();

    assert_eq!(first.resource.arn, second.resource.arn);
    let named = cloud
        .list_policies(PolicyScope::Local)
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.name == "TestPolicy")
        .count();
    assert_eq!(named, 1);
}

#[tokio::test]
async fn test_bucket_is_idempotent() {
    let cloud = InMemoryCloud::new();
    let storage = storage(&cloud);

    storage.ensure_bucket("cloudforge-artifacts").await.unwrap();
    storage.ensure_bucket("cloudforge-artifacts").await.unwrap();

    let buckets = cloud.list_buckets().await.unwrap();
    let matching: Vec<_> = buckets
        .iter()
        .filter(|b| b.name == "cloudforge-artifacts")
        .collect();
    assert_eq!(matching.len(), 1);
    assert!(matching[0].versioning_enabled);
}

#[tokio::test]
async fn test_upload_failure_does_not_raise() {
    let cloud = InMemoryCloud::new();
    let storage = storage(&cloud);
    storage.ensure_bucket("cloudforge-artifacts").await.unwrap();

    cloud
        .fail_next_with(
            Operation::PutObject,
            RemoteErrorKind::Other("InternalError".to_string()),
        )
        .await;

    let written = storage
        .upload_object("cloudforge-artifacts", "artifact.txt", b"payload".to_vec())
        .await;

    assert!(!written);
    assert_eq!(cloud.calls(Operation::PutObject).await, 1);
    assert_eq!(cloud.object_count("cloudforge-artifacts").await, 0);
}

#[tokio::test]
async fn test_flows_are_independent() {
    let cloud = InMemoryCloud::new();

    identities(&cloud).ensure_user("cloudforge-user").await.unwrap();
    storage(&cloud).ensure_bucket("cloudforge-artifacts").await.unwrap();

    assert_eq!(cloud.calls(Operation::CreatePolicy).await, 0);
    assert_eq!(cloud.calls(Operation::PutObject).await, 0);
}
