//! Resource model shared by the client and the provisioners

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Amazon Resource Name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arn(String);

impl Arn {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn iam_user(account_id: &str, name: &str) -> Self {
        Self(format!("arn:aws:iam::{}:user/{}", account_id, name))
    }

    /// ARN of a customer-managed policy. Only correct when `account_id` is the
    /// account the client is talking to.
    pub fn iam_policy(account_id: &str, name: &str) -> Self {
        Self(format!("arn:aws:iam::{}:policy/{}", account_id, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Arn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Arn {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Arn {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// IAM user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub arn: Arn,
}

/// Customer-managed IAM policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    pub arn: Arn,

    /// Policy document; `None` when the policy was read back with a probe,
    /// which does not return the document.
    pub document: Option<String>,
}

/// Which policies a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyScope {
    /// Every policy visible to the account
    All,
    /// AWS-managed policies only
    Aws,
    /// Customer-managed policies only
    Local,
}

/// S3 bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub versioning_enabled: bool,
}

/// Bucket versioning state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning was never configured on the bucket
    Unversioned,
    Enabled,
    Suspended,
}

/// Object uploaded to a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub timestamp: String,
}

impl Artifact {
    /// Build the timestamped test artifact: key `<timestamp>.txt`, text body.
    ///
    /// The timestamp is ISO-8601 local time without an offset. The fractional
    /// part has six digits and is left out entirely when it is zero.
    pub fn stamped<Tz>(bucket: impl Into<String>, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let format = if now.nanosecond() / 1_000 == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.6f"
        };
        let timestamp = now.format(format).to_string();
        Self {
            bucket: bucket.into(),
            key: format!("{}.txt", timestamp),
            body: format!("This is a test artifact uploaded at {}.", timestamp).into_bytes(),
            timestamp,
        }
    }

    /// `s3://bucket/key`
    pub fn s3_path(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// IAM policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,

    #[serde(rename = "Statement")]
    pub statement: Vec<Statement>,
}

/// Single statement of a policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Effect")]
    pub effect: Effect,

    #[serde(rename = "Action")]
    pub action: OneOrMany,

    #[serde(rename = "Resource")]
    pub resource: OneOrMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// `"*"` or `["s3:GetObject", ...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    /// Allow every action on every resource.
    pub fn allow_all() -> Self {
        Self::new(vec![Statement {
            effect: Effect::Allow,
            action: OneOrMany::One("*".to_string()),
            resource: OneOrMany::One("*".to_string()),
        }])
    }

    /// Read/write/delete access to the objects matched by `resource`
    /// (e.g. `arn:aws:s3:::cloudforge-*/*`).
    pub fn object_access(resource: impl Into<String>) -> Self {
        Self::new(vec![Statement {
            effect: Effect::Allow,
            action: OneOrMany::Many(
                ["s3:GetObject", "s3:PutObject", "s3:DeleteObject"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            resource: OneOrMany::One(resource.into()),
        }])
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How an `ensure_*` call reached the present state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// This call created the resource
    Created,
    /// The resource was already there
    Existing,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Existing => write!(f, "existing"),
        }
    }
}

/// Result of an idempotent `ensure_*` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured<T> {
    pub resource: T,
    pub outcome: Outcome,
}

impl<T> Ensured<T> {
    pub fn created(resource: T) -> Self {
        Self {
            resource,
            outcome: Outcome::Created,
        }
    }

    pub fn existing(resource: T) -> Self {
        Self {
            resource,
            outcome: Outcome::Existing,
        }
    }

    pub fn is_created(&self) -> bool {
        self.outcome == Outcome::Created
    }
}
