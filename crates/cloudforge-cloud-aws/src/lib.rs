//! AWS client for CloudForge
//!
//! This crate implements the `CloudClient` trait on top of the AWS SDK
//! (IAM and S3), so the CloudForge provisioners can run against AWS or a
//! local emulator such as LocalStack.
//!
//! # Requirements
//!
//! - An endpoint: real AWS, or LocalStack on `http://localhost:4566`
//! - Credentials: static keys in the settings, or the SDK default chain
//!
//! # Example
//!
//! ```ignore
//! use cloudforge_cloud::{CloudClient, StorageProvisioner};
//! use cloudforge_cloud_aws::{AwsCloudClient, AwsSettings, StaticCredentials};
//! use std::sync::Arc;
//!
//! let settings = AwsSettings {
//!     region: "us-east-1".to_string(),
//!     endpoint_url: Some("http://localhost:4566".to_string()),
//!     credentials: Some(StaticCredentials {
//!         access_key_id: "test".to_string(),
//!         secret_access_key: "test".to_string(),
//!     }),
//! };
//! let client = Arc::new(AwsCloudClient::connect(&settings).await?);
//!
//! let storage = StorageProvisioner::new(client);
//! storage.ensure_bucket("cloudforge-artifacts").await?;
//! ```

pub mod client;
pub mod error;

pub use client::{AwsCloudClient, AwsSettings, StaticCredentials, location_constraint};
pub use error::{AwsError, Result};
