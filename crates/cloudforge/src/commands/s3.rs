use super::{Context, print_failure, print_outcome};
use cloudforge_cloud::{Artifact, CloudClient, Outcome, ProvisionReport, StorageProvisioner};
use cloudforge_config::Config;
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

pub async fn handle(
    ctx: &Context,
    bucket: Option<&str>,
    skip_upload: bool,
) -> anyhow::Result<ProvisionReport> {
    println!("{}", "Provisioning S3 resources...".blue());
    let started = Instant::now();

    let client = ctx.client().await?;
    let mut report = ProvisionReport::new();
    provision(client, &ctx.config, bucket, skip_upload, &mut report).await;

    report.duration_ms = started.elapsed().as_millis() as u64;
    Ok(report)
}

/// Ensure the versioned bucket, then upload one timestamped artifact into it.
///
/// The upload is skipped when the bucket could not be ensured. A failed
/// upload is reported as a warning and does not fail the run.
pub async fn provision(
    client: Arc<dyn CloudClient>,
    config: &Config,
    bucket: Option<&str>,
    skip_upload: bool,
    report: &mut ProvisionReport,
) {
    let storage = StorageProvisioner::new(client);
    let bucket_name = bucket.unwrap_or(&config.resources.bucket_name);

    match storage.ensure_bucket(bucket_name).await {
        Ok(ensured) => {
            print_outcome("S3 bucket", bucket_name, ensured.outcome);
            println!("  Versioning: enabled");
            report.record("s3-bucket", bucket_name, ensured.outcome);
        }
        Err(e) => {
            print_failure("S3 bucket", bucket_name, &e);
            report.record_failure("s3-bucket", bucket_name, e);
            return;
        }
    }

    if skip_upload {
        return;
    }

    let artifact = Artifact::stamped(bucket_name, chrono::Local::now());
    let path = artifact.s3_path();
    if storage.upload_artifact(&artifact).await {
        print_outcome("S3 object", &path, Outcome::Created);
        report.record("s3-object", path, Outcome::Created);
    } else {
        print_failure("S3 object", &path, &"upload failed");
        report.record_warning("s3-object", path, "upload failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudforge_cloud::{InMemoryCloud, Operation, RemoteErrorKind};

    #[tokio::test]
    async fn test_provision_bucket_and_artifact() {
        let cloud = InMemoryCloud::new();
        let mut report = ProvisionReport::new();

        provision(Arc::new(cloud.clone()), &Config::default(), None, false, &mut report).await;

        assert!(report.is_success());
        assert_eq!(report.summary().created, 2);
        assert_eq!(cloud.object_count("cloudforge-artifacts").await, 1);
    }

    #[tokio::test]
    async fn test_skip_upload() {
        let cloud = InMemoryCloud::new();
        let mut report = ProvisionReport::new();

        provision(
            Arc::new(cloud.clone()),
            &Config::default(),
            Some("reports"),
            true,
            &mut report,
        )
        .await;

        assert_eq!(report.entries.len(), 1);
        assert_eq!(cloud.calls(Operation::PutObject).await, 0);
    }

    #[tokio::test]
    async fn test_upload_failure_is_a_warning() {
        let cloud = InMemoryCloud::new();
        cloud
            .fail_next_with(Operation::PutObject, RemoteErrorKind::Other("InternalError".into()))
            .await;
        let mut report = ProvisionReport::new();

        provision(Arc::new(cloud.clone()), &Config::default(), None, false, &mut report).await;

        assert!(report.is_success());
        assert!(report.failures().is_empty());
        assert_eq!(report.warnings()[0].resource_type, "s3-object");
        assert_eq!(report.summary().created, 1);
        assert_eq!(cloud.object_count("cloudforge-artifacts").await, 0);
    }

    #[tokio::test]
    async fn test_bucket_failure_skips_upload() {
        let cloud = InMemoryCloud::new();
        cloud
            .fail_next_with(Operation::CreateBucket, RemoteErrorKind::Other("AccessDenied".into()))
            .await;
        let mut report = ProvisionReport::new();

        provision(Arc::new(cloud.clone()), &Config::default(), None, false, &mut report).await;

        assert_eq!(report.entries.len(), 1);
        assert_eq!(cloud.calls(Operation::PutObject).await, 0);
    }
}
