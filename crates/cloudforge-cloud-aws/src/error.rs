//! AWS client error types

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use cloudforge_cloud::{CloudError, RemoteErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("Invalid AWS settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, AwsError>;

/// Turn an SDK failure into a [`CloudError::Remote`], parsing the service
/// error code into a [`RemoteErrorKind`].
///
/// Failures that never reached the service (dispatch, timeout, construction)
/// carry no code and map to `RemoteErrorKind::Other("Unknown")`.
pub(crate) fn remote_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let kind = RemoteErrorKind::from_code(err.code());
    let message = DisplayErrorContext(&err).to_string();

    tracing::debug!("{} returned {}: {}", operation, kind, message);
    CloudError::remote(operation, kind, message)
}
