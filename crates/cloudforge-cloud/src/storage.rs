//! S3 bucket and object provisioning

use std::sync::Arc;

use crate::client::CloudClient;
use crate::error::{RemoteErrorKind, Result};
use crate::model::{Artifact, Bucket, Ensured, VersioningStatus};

/// Ensures versioned buckets exist and uploads objects into them.
pub struct StorageProvisioner {
    client: Arc<dyn CloudClient>,
}

impl StorageProvisioner {
    pub fn new(client: Arc<dyn CloudClient>) -> Self {
        Self { client }
    }

    /// Create the bucket if needed, then enable versioning on it.
    ///
    /// `BucketAlreadyOwnedByYou` and `BucketAlreadyExists` count as success.
    /// Versioning is enabled on every call.
    pub async fn ensure_bucket(&self, name: &str) -> Result<Ensured<Bucket>> {
        let created = match self.client.create_bucket(name).await {
            Ok(()) => {
                tracing::info!("Created bucket {}", name);
                true
            }
            Err(e)
                if matches!(
                    e.remote_kind(),
                    Some(
                        RemoteErrorKind::BucketAlreadyOwnedByYou
                            | RemoteErrorKind::BucketAlreadyExists
                    )
                ) =>
            {
                tracing::debug!("Bucket {} already exists", name);
                false
            }
            Err(e) => return Err(e),
        };

        self.client
            .put_bucket_versioning(name, VersioningStatus::Enabled)
            .await?;
        tracing::info!("Versioning enabled on bucket {}", name);

        let bucket = Bucket {
            name: name.to_string(),
            versioning_enabled: true,
        };
        Ok(if created {
            Ensured::created(bucket)
        } else {
            Ensured::existing(bucket)
        })
    }

    /// Best-effort upload: failures are logged, never returned.
    ///
    /// Returns whether the object was written.
    pub async fn upload_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> bool {
        tracing::debug!("Uploading {} ({} bytes) to bucket {}", key, body.len(), bucket);

        match self.client.put_object(bucket, key, body).await {
            Ok(()) => {
                tracing::info!("Uploaded s3://{}/{}", bucket, key);
                true
            }
            Err(e) => {
                tracing::error!("Upload of s3://{}/{} failed: {}", bucket, key, e);
                false
            }
        }
    }

    pub async fn upload_artifact(&self, artifact: &Artifact) -> bool {
        self.upload_object(&artifact.bucket, &artifact.key, artifact.body.clone())
            .await
    }
}
