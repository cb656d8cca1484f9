//! CloudForge cloud provisioning
//!
//! This crate provides the cloud client abstraction for CloudForge and the
//! idempotent provisioners built on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 CloudForge CLI                  │
//! │            (cloudforge iam / s3 / up)           │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               cloudforge-cloud                  │
//! │  ┌─────────────────────┐ ┌───────────────────┐  │
//! │  │ IdentityProvisioner │ │StorageProvisioner │  │
//! │  └──────────┬──────────┘ └─────────┬─────────┘  │
//! │  ┌──────────▼──────────────────────▼─────────┐  │
//! │  │       trait CloudClient { ... }           │  │
//! │  └───────────────────────────────────────────┘  │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │  AWS SDK      │ │  in-memory    │
//! │  (LocalStack) │ │  (tests)      │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! Every `ensure_*` call converges: repeated calls with the same name leave
//! one resource behind and return the same ARN.

pub mod client;
pub mod error;
pub mod identity;
pub mod memory;
pub mod model;
pub mod report;
pub mod storage;

// Re-exports
pub use client::CloudClient;
pub use error::{CloudError, RemoteErrorKind, Result};
pub use identity::IdentityProvisioner;
pub use memory::{InMemoryCloud, Operation};
pub use model::{
    Arn, Artifact, Bucket, Effect, Ensured, Identity, OneOrMany, Outcome, Policy, PolicyDocument,
    PolicyScope, Statement, VersioningStatus,
};
pub use report::{ProvisionReport, ReportEntry, ReportOutcome, ReportSummary};
pub use storage::StorageProvisioner;
