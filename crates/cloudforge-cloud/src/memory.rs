//! In-memory cloud client.
//!
//! Keeps users, policies, buckets and objects in process memory and answers
//! with the same error codes the real services use. Failures can be queued
//! per operation to exercise error paths and probe/create races.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::CloudClient;
use crate::error::{CloudError, RemoteErrorKind, Result};
use crate::model::{Arn, Bucket, Identity, Policy, PolicyScope, VersioningStatus};

/// Account id the in-memory client reports in ARNs unless told otherwise.
pub const DEFAULT_ACCOUNT_ID: &str = "000000000000";

/// Client operations, used to target failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateUser,
    GetUser,
    ListUsers,
    CreatePolicy,
    GetPolicy,
    ListPolicies,
    CreateBucket,
    PutBucketVersioning,
    GetBucketVersioning,
    ListBuckets,
    PutObject,
}

impl Operation {
    /// Service operation name, as it appears in errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateUser => "CreateUser",
            Operation::GetUser => "GetUser",
            Operation::ListUsers => "ListUsers",
            Operation::CreatePolicy => "CreatePolicy",
            Operation::GetPolicy => "GetPolicy",
            Operation::ListPolicies => "ListPolicies",
            Operation::CreateBucket => "CreateBucket",
            Operation::PutBucketVersioning => "PutBucketVersioning",
            Operation::GetBucketVersioning => "GetBucketVersioning",
            Operation::ListBuckets => "ListBuckets",
            Operation::PutObject => "PutObject",
        }
    }
}

struct StoredBucket {
    versioning: VersioningStatus,
    objects: BTreeMap<String, Vec<u8>>,
}

#[derive(Default)]
struct InMemoryState {
    /// Keyed by user name
    users: BTreeMap<String, Identity>,

    /// Keyed by policy ARN
    policies: BTreeMap<String, Policy>,

    buckets: BTreeMap<String, StoredBucket>,

    /// One-shot failures, consumed in order
    failures: HashMap<Operation, VecDeque<CloudError>>,

    calls: HashMap<Operation, usize>,
}

impl InMemoryState {
    /// Count the call and pop a queued failure for it, if any.
    fn enter(&mut self, op: Operation) -> Result<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory [`CloudClient`]
#[derive(Clone)]
pub struct InMemoryCloud {
    account_id: String,
    state: Arc<Mutex<InMemoryState>>,
}

impl Default for InMemoryCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::with_account(DEFAULT_ACCOUNT_ID)
    }

    pub fn with_account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            state: Arc::new(Mutex::new(InMemoryState::default())),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Make the next call of `op` fail with `error`. Queued failures are
    /// consumed one per call, in order.
    pub async fn fail_next(&self, op: Operation, error: CloudError) {
        let mut state = self.state.lock().await;
        state.failures.entry(op).or_default().push_back(error);
    }

    /// Queue a remote failure with the given code for the next call of `op`.
    pub async fn fail_next_with(&self, op: Operation, kind: RemoteErrorKind) {
        let message = format!("injected {} failure", kind);
        self.fail_next(op, CloudError::remote(op.as_str(), kind, message))
            .await;
    }

    /// Number of times `op` was called, including failed calls.
    pub async fn calls(&self, op: Operation) -> usize {
        let state = self.state.lock().await;
        state.calls.get(&op).copied().unwrap_or(0)
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().await;
        state
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key).cloned())
    }

    pub async fn object_count(&self, bucket: &str) -> usize {
        let state = self.state.lock().await;
        state.buckets.get(bucket).map_or(0, |b| b.objects.len())
    }
}

#[async_trait]
impl CloudClient for InMemoryCloud {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn create_user(&self, name: &str) -> Result<Identity> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreateUser)?;

        if state.users.contains_key(name) {
            return Err(CloudError::remote(
                "CreateUser",
                RemoteErrorKind::EntityAlreadyExists,
                format!("User with name {} already exists.", name),
            ));
        }

        let identity = Identity {
            name: name.to_string(),
            arn: Arn::iam_user(&self.account_id, name),
        };
        state.users.insert(name.to_string(), identity.clone());
        Ok(identity)
    }

    async fn get_user(&self, name: &str) -> Result<Identity> {
        let mut state = self.state.lock().await;
        state.enter(Operation::GetUser)?;

        state.users.get(name).cloned().ok_or_else(|| {
            CloudError::remote(
                "GetUser",
                RemoteErrorKind::NoSuchEntity,
                format!("The user with name {} cannot be found.", name),
            )
        })
    }

    async fn list_users(&self) -> Result<Vec<Identity>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::ListUsers)?;
        Ok(state.users.values().cloned().collect())
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<Policy> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreatePolicy)?;

        // The service rejects documents that are not JSON.
        serde_json::from_str::<serde_json::Value>(document).map_err(|e| {
            CloudError::remote(
                "CreatePolicy",
                RemoteErrorKind::Other("MalformedPolicyDocument".to_string()),
                e.to_string(),
            )
        })?;

        let arn = Arn::iam_policy(&self.account_id, name);
        if state.policies.contains_key(arn.as_str()) {
            return Err(CloudError::remote(
                "CreatePolicy",
                RemoteErrorKind::EntityAlreadyExists,
                format!("A policy called {} already exists. Duplicate names are not allowed.", name),
            ));
        }

        let policy = Policy {
            name: name.to_string(),
            arn: arn.clone(),
            document: Some(document.to_string()),
        };
        state.policies.insert(arn.to_string(), policy.clone());
        Ok(policy)
    }

    async fn get_policy(&self, arn: &Arn) -> Result<Policy> {
        let mut state = self.state.lock().await;
        state.enter(Operation::GetPolicy)?;

        state
            .policies
            .get(arn.as_str())
            .map(|p| Policy {
                document: None,
                ..p.clone()
            })
            .ok_or_else(|| {
                CloudError::remote(
                    "GetPolicy",
                    RemoteErrorKind::NoSuchEntity,
                    format!("Policy {} was not found.", arn),
                )
            })
    }

    async fn list_policies(&self, scope: PolicyScope) -> Result<Vec<Policy>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::ListPolicies)?;

        // Only customer-managed policies are modelled.
        let policies = match scope {
            PolicyScope::All | PolicyScope::Local => state
                .policies
                .values()
                .map(|p| Policy {
                    document: None,
                    ..p.clone()
                })
                .collect(),
            PolicyScope::Aws => Vec::new(),
        };
        Ok(policies)
    }

    async fn create_bucket(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreateBucket)?;

        if state.buckets.contains_key(name) {
            return Err(CloudError::remote(
                "CreateBucket",
                RemoteErrorKind::BucketAlreadyOwnedByYou,
                "Your previous request to create the named bucket succeeded and you already own it.",
            ));
        }

        state.buckets.insert(
            name.to_string(),
            StoredBucket {
                versioning: VersioningStatus::Unversioned,
                objects: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn put_bucket_versioning(&self, bucket: &str, status: VersioningStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::PutBucketVersioning)?;

        let stored = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket("PutBucketVersioning", bucket))?;
        stored.versioning = status;
        Ok(())
    }

    async fn get_bucket_versioning(&self, bucket: &str) -> Result<VersioningStatus> {
        let mut state = self.state.lock().await;
        state.enter(Operation::GetBucketVersioning)?;

        state
            .buckets
            .get(bucket)
            .map(|b| b.versioning)
            .ok_or_else(|| no_such_bucket("GetBucketVersioning", bucket))
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::ListBuckets)?;

        Ok(state
            .buckets
            .iter()
            .map(|(name, b)| Bucket {
                name: name.clone(),
                versioning_enabled: b.versioning == VersioningStatus::Enabled,
            })
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::PutObject)?;

        let stored = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket("PutObject", bucket))?;
        stored.objects.insert(key.to_string(), body);
        Ok(())
    }
}

fn no_such_bucket(operation: &'static str, bucket: &str) -> CloudError {
    CloudError::remote(
        operation,
        RemoteErrorKind::NoSuchBucket,
        format!("The specified bucket {} does not exist", bucket),
    )
}
