//! AWS SDK implementation of [`CloudClient`]

use crate::error::{AwsError, Result, remote_error};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_iam::types::PolicyScopeType;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};
use cloudforge_cloud::{
    Arn, Bucket, CloudClient, CloudError, Identity, Policy, PolicyScope, VersioningStatus,
};
use serde::{Deserialize, Serialize};

/// Region S3 creates buckets in when no location constraint is sent
const DEFAULT_S3_REGION: &str = "us-east-1";

/// Static access keys handed to the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// How to reach AWS (or an emulator standing in for it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSettings {
    pub region: String,

    /// Endpoint override, e.g. `http://localhost:4566` for LocalStack
    pub endpoint_url: Option<String>,

    /// `None` defers to the SDK's default credential chain
    pub credentials: Option<StaticCredentials>,
}

impl AwsSettings {
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(AwsError::InvalidSettings("region is empty".to_string()));
        }
        if let Some(endpoint) = &self.endpoint_url {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(AwsError::InvalidSettings(format!(
                    "endpoint URL must start with http:// or https://: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

/// IAM + S3 client
pub struct AwsCloudClient {
    iam: aws_sdk_iam::Client,
    s3: aws_sdk_s3::Client,
    region: String,
}

impl AwsCloudClient {
    /// Load an SDK configuration from `settings` and build both service clients.
    pub async fn connect(settings: &AwsSettings) -> Result<Self> {
        settings.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(creds) = &settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                None,
                None,
                "cloudforge-static",
            ));
        }

        let sdk_config = loader.load().await;
        tracing::debug!(
            "AWS client for region {} (endpoint: {})",
            settings.region,
            settings.endpoint_url.as_deref().unwrap_or("default")
        );

        Ok(Self::from_sdk_config(&sdk_config, settings.region.clone()))
    }

    /// Build from an already loaded SDK configuration.
    pub fn from_sdk_config(sdk_config: &SdkConfig, region: impl Into<String>) -> Self {
        // LocalStack serves buckets on the path, not on virtual hosts.
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(true)
            .build();

        Self {
            iam: aws_sdk_iam::Client::new(sdk_config),
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// `CreateBucketConfiguration` for `region`; none for `us-east-1`, which
/// rejects an explicit constraint.
pub fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_S3_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

fn identity_from(user: &aws_sdk_iam::types::User) -> Identity {
    Identity {
        name: user.user_name().to_string(),
        arn: Arn::new(user.arn()),
    }
}

fn policy_from(
    operation: &'static str,
    policy: &aws_sdk_iam::types::Policy,
    document: Option<String>,
) -> cloudforge_cloud::Result<Policy> {
    let arn = policy.arn().ok_or(CloudError::MissingField {
        operation,
        field: "Policy.Arn",
    })?;
    let name = policy.policy_name().ok_or(CloudError::MissingField {
        operation,
        field: "Policy.PolicyName",
    })?;

    Ok(Policy {
        name: name.to_string(),
        arn: Arn::new(arn),
        document,
    })
}

#[async_trait]
impl CloudClient for AwsCloudClient {
    fn name(&self) -> &str {
        "aws"
    }

    async fn create_user(&self, name: &str) -> cloudforge_cloud::Result<Identity> {
        let output = self
            .iam
            .create_user()
            .user_name(name)
            .send()
            .await
            .map_err(|e| remote_error("CreateUser", e))?;

        output.user().map(identity_from).ok_or(CloudError::MissingField {
            operation: "CreateUser",
            field: "User",
        })
    }

    async fn get_user(&self, name: &str) -> cloudforge_cloud::Result<Identity> {
        let output = self
            .iam
            .get_user()
            .user_name(name)
            .send()
            .await
            .map_err(|e| remote_error("GetUser", e))?;

        output.user().map(identity_from).ok_or(CloudError::MissingField {
            operation: "GetUser",
            field: "User",
        })
    }

    async fn list_users(&self) -> cloudforge_cloud::Result<Vec<Identity>> {
        let users = self
            .iam
            .list_users()
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| remote_error("ListUsers", e))?;

        Ok(users.iter().map(identity_from).collect())
    }

    async fn create_policy(&self, name: &str, document: &str) -> cloudforge_cloud::Result<Policy> {
        let output = self
            .iam
            .create_policy()
            .policy_name(name)
            .policy_document(document)
            .send()
            .await
            .map_err(|e| remote_error("CreatePolicy", e))?;

        let policy = output.policy().ok_or(CloudError::MissingField {
            operation: "CreatePolicy",
            field: "Policy",
        })?;
        policy_from("CreatePolicy", policy, Some(document.to_string()))
    }

    async fn get_policy(&self, arn: &Arn) -> cloudforge_cloud::Result<Policy> {
        let output = self
            .iam
            .get_policy()
            .policy_arn(arn.as_str())
            .send()
            .await
            .map_err(|e| remote_error("GetPolicy", e))?;

        let policy = output.policy().ok_or(CloudError::MissingField {
            operation: "GetPolicy",
            field: "Policy",
        })?;
        policy_from("GetPolicy", policy, None)
    }

    async fn list_policies(&self, scope: PolicyScope) -> cloudforge_cloud::Result<Vec<Policy>> {
        let scope = match scope {
            PolicyScope::All => PolicyScopeType::All,
            PolicyScope::Aws => PolicyScopeType::Aws,
            PolicyScope::Local => PolicyScopeType::Local,
        };

        let policies = self
            .iam
            .list_policies()
            .scope(scope)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| remote_error("ListPolicies", e))?;

        policies
            .iter()
            .map(|policy| policy_from("ListPolicies", policy, None))
            .collect()
    }

    async fn create_bucket(&self, name: &str) -> cloudforge_cloud::Result<()> {
        self.s3
            .create_bucket()
            .bucket(name)
            .set_create_bucket_configuration(location_constraint(&self.region))
            .send()
            .await
            .map_err(|e| remote_error("CreateBucket", e))?;
        Ok(())
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        status: VersioningStatus,
    ) -> cloudforge_cloud::Result<()> {
        let status = match status {
            VersioningStatus::Enabled => BucketVersioningStatus::Enabled,
            // A bucket can't go back to unversioned; suspending is the closest.
            VersioningStatus::Suspended | VersioningStatus::Unversioned => {
                BucketVersioningStatus::Suspended
            }
        };

        self.s3
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(VersioningConfiguration::builder().status(status).build())
            .send()
            .await
            .map_err(|e| remote_error("PutBucketVersioning", e))?;
        Ok(())
    }

    async fn get_bucket_versioning(&self, bucket: &str) -> cloudforge_cloud::Result<VersioningStatus> {
        let output = self
            .s3
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| remote_error("GetBucketVersioning", e))?;

        Ok(match output.status() {
            Some(BucketVersioningStatus::Enabled) => VersioningStatus::Enabled,
            Some(BucketVersioningStatus::Suspended) => VersioningStatus::Suspended,
            _ => VersioningStatus::Unversioned,
        })
    }

    async fn list_buckets(&self) -> cloudforge_cloud::Result<Vec<Bucket>> {
        let output = self
            .s3
            .list_buckets()
            .send()
            .await
            .map_err(|e| remote_error("ListBuckets", e))?;

        let mut buckets = Vec::new();
        for name in output.buckets().iter().filter_map(|b| b.name()) {
            let versioning = self.get_bucket_versioning(name).await?;
            buckets.push(Bucket {
                name: name.to_string(),
                versioning_enabled: versioning == VersioningStatus::Enabled,
            });
        }
        Ok(buckets)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> cloudforge_cloud::Result<()> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| remote_error("PutObject", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localstack() -> AwsSettings {
        AwsSettings {
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://localhost:4566".to_string()),
            credentials: Some(StaticCredentials {
                access_key_id: "test".to_string(),
                secret_access_key: "test".to_string(),
            }),
        }
    }

    #[test]
    fn test_no_constraint_in_us_east_1() {
        assert!(location_constraint("us-east-1").is_none());
    }

    #[test]
    fn test_constraint_outside_us_east_1() {
        let config = location_constraint("eu-central-1").unwrap();
        assert_eq!(
            config.location_constraint(),
            Some(&BucketLocationConstraint::EuCentral1)
        );
    }

    #[test]
    fn test_settings_validation() {
        assert!(localstack().validate().is_ok());

        let mut no_region = localstack();
        no_region.region = " ".to_string();
        assert!(matches!(
            no_region.validate(),
            Err(AwsError::InvalidSettings(_))
        ));

        let mut bad_endpoint = localstack();
        bad_endpoint.endpoint_url = Some("localhost:4566".to_string());
        assert!(bad_endpoint.validate().is_err());
    }

    #[tokio::test]
    async fn test_connect_does_not_touch_network() {
        let client = AwsCloudClient::connect(&localstack()).await.unwrap();
        assert_eq!(client.name(), "aws");
        assert_eq!(client.region(), "us-east-1");
    }
}
