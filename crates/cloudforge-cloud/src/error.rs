//! Cloud client error types

use thiserror::Error;

/// Error codes reported by the remote service that provisioning logic reacts to.
///
/// Codes are parsed once at the client boundary; everything the provisioners
/// do not recognise is carried as [`RemoteErrorKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// IAM `EntityAlreadyExists` (user or policy)
    EntityAlreadyExists,
    /// IAM `NoSuchEntity` (probe miss)
    NoSuchEntity,
    /// S3 `BucketAlreadyOwnedByYou`
    BucketAlreadyOwnedByYou,
    /// S3 `BucketAlreadyExists`
    BucketAlreadyExists,
    /// S3 `NoSuchBucket`
    NoSuchBucket,
    /// Any other code, or none at all
    Other(String),
}

impl RemoteErrorKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("EntityAlreadyExists") => Self::EntityAlreadyExists,
            Some("NoSuchEntity") => Self::NoSuchEntity,
            Some("BucketAlreadyOwnedByYou") => Self::BucketAlreadyOwnedByYou,
            Some("BucketAlreadyExists") => Self::BucketAlreadyExists,
            Some("NoSuchBucket") => Self::NoSuchBucket,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("Unknown".to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::EntityAlreadyExists => "EntityAlreadyExists",
            Self::NoSuchEntity => "NoSuchEntity",
            Self::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::Other(code) => code,
        }
    }

    /// Whether the code means the resource is already there.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EntityAlreadyExists | Self::BucketAlreadyOwnedByYou | Self::BucketAlreadyExists
        )
    }
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Cloud client errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{operation} failed ({kind}): {message}")]
    Remote {
        operation: &'static str,
        kind: RemoteErrorKind,
        message: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn remote(
        operation: &'static str,
        kind: RemoteErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// The remote error kind, if this error came from the service.
    pub fn remote_kind(&self) -> Option<&RemoteErrorKind> {
        match self {
            Self::Remote { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn is_remote(&self, expected: &RemoteErrorKind) -> bool {
        self.remote_kind() == Some(expected)
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known() {
        assert_eq!(
            RemoteErrorKind::from_code(Some("EntityAlreadyExists")),
            RemoteErrorKind::EntityAlreadyExists
        );
        assert_eq!(
            RemoteErrorKind::from_code(Some("BucketAlreadyOwnedByYou")),
            RemoteErrorKind::BucketAlreadyOwnedByYou
        );
        assert_eq!(
            RemoteErrorKind::from_code(Some("NoSuchEntity")),
            RemoteErrorKind::NoSuchEntity
        );
    }

    #[test]
    fn test_from_code_unknown() {
        let kind = RemoteErrorKind::from_code(Some("AccessDenied"));
        assert_eq!(kind, RemoteErrorKind::Other("AccessDenied".to_string()));
        assert_eq!(kind.code(), "AccessDenied");
        assert!(!kind.is_conflict());

        assert_eq!(
            RemoteErrorKind::from_code(None),
            RemoteErrorKind::Other("Unknown".to_string())
        );
    }

    #[test]
    fn test_conflict_kinds() {
        assert!(RemoteErrorKind::EntityAlreadyExists.is_conflict());
        assert!(RemoteErrorKind::BucketAlreadyExists.is_conflict());
        assert!(!RemoteErrorKind::NoSuchEntity.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = CloudError::remote("CreateUser", RemoteErrorKind::EntityAlreadyExists, "taken");
        assert_eq!(err.to_string(), "CreateUser failed (EntityAlreadyExists): taken");
        assert!(err.is_remote(&RemoteErrorKind::EntityAlreadyExists));
    }
}
