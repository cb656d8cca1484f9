//! Cloud client trait definition

use crate::error::Result;
use crate::model::{Arn, Bucket, Identity, Policy, PolicyScope, VersioningStatus};
use async_trait::async_trait;

/// Remote operations the provisioners need from the cloud.
///
/// Implementations map every service failure to
/// [`CloudError::Remote`](crate::CloudError::Remote) with the error code
/// already parsed into a [`RemoteErrorKind`](crate::RemoteErrorKind), so the
/// provisioners never compare code strings themselves.
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Returns the client name (e.g., "aws", "in-memory")
    fn name(&self) -> &str;

    // ========== IAM ==========

    /// Create an IAM user. Fails with `EntityAlreadyExists` if the name is taken.
    async fn create_user(&self, name: &str) -> Result<Identity>;

    /// Fetch an IAM user by name. Fails with `NoSuchEntity` if absent.
    async fn get_user(&self, name: &str) -> Result<Identity>;

    async fn list_users(&self) -> Result<Vec<Identity>>;

    /// Create a managed policy from a JSON document.
    async fn create_policy(&self, name: &str, document: &str) -> Result<Policy>;

    /// Fetch a managed policy by ARN. Fails with `NoSuchEntity` if absent.
    async fn get_policy(&self, arn: &Arn) -> Result<Policy>;

    async fn list_policies(&self, scope: PolicyScope) -> Result<Vec<Policy>>;

    // ========== S3 ==========

    /// Create a bucket. Fails with `BucketAlreadyOwnedByYou` or
    /// `BucketAlreadyExists` if the name is taken.
    async fn create_bucket(&self, name: &str) -> Result<()>;

    async fn put_bucket_versioning(&self, bucket: &str, status: VersioningStatus) -> Result<()>;

    async fn get_bucket_versioning(&self, bucket: &str) -> Result<VersioningStatus>;

    async fn list_buckets(&self) -> Result<Vec<Bucket>>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
