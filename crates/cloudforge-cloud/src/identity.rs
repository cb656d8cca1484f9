//! IAM user and managed policy provisioning

use std::sync::Arc;

use crate::client::CloudClient;
use crate::error::{RemoteErrorKind, Result};
use crate::model::{Arn, Ensured, Identity, Policy};

/// Ensures IAM users and managed policies exist.
///
/// Users are created first and recovered on conflict; policies are probed by
/// their expected ARN first and created on a miss.
pub struct IdentityProvisioner {
    client: Arc<dyn CloudClient>,
    account_id: String,
}

impl IdentityProvisioner {
    /// `account_id` is only used to build the expected policy ARN. The
    /// emulator's placeholder account is not valid against a real account.
    pub fn new(client: Arc<dyn CloudClient>, account_id: impl Into<String>) -> Self {
        Self {
            client,
            account_id: account_id.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// ARN the policy called `name` has (or will have).
    pub fn policy_arn(&self, name: &str) -> Arn {
        Arn::iam_policy(&self.account_id, name)
    }

    /// Create the user, or return the existing one if the name is taken.
    pub async fn ensure_user(&self, name: &str) -> Result<Ensured<Identity>> {
        match self.client.create_user(name).await {
            Ok(identity) => {
                tracing::info!("Created IAM user {} ({})", name, identity.arn);
                Ok(Ensured::created(identity))
            }
            Err(e) if e.is_remote(&RemoteErrorKind::EntityAlreadyExists) => {
                tracing::debug!("IAM user {} already exists, reading it back", name);
                let identity = self.client.get_user(name).await?;
                Ok(Ensured::existing(identity))
            }
            Err(e) => Err(e),
        }
    }

    /// Return the policy at the expected ARN, creating it from `document` on a miss.
    pub async fn ensure_policy(&self, name: &str, document: &str) -> Result<Ensured<Policy>> {
        let arn = self.policy_arn(name);

        match self.client.get_policy(&arn).await {
            Ok(policy) => {
                tracing::debug!("IAM policy {} already exists", arn);
                return Ok(Ensured::existing(policy));
            }
            Err(e) if e.is_remote(&RemoteErrorKind::NoSuchEntity) => {}
            Err(e) => return Err(e),
        }

        match self.client.create_policy(name, document).await {
            Ok(policy) => {
                tracing::info!("Created IAM policy {} ({})", name, policy.arn);
                Ok(Ensured::created(policy))
            }
            // Created concurrently between the probe and the create.
            Err(e) if e.is_remote(&RemoteErrorKind::EntityAlreadyExists) => {
                tracing::debug!("IAM policy {} appeared after probe", arn);
                Ok(Ensured::existing(Policy {
                    name: name.to_string(),
                    arn,
                    document: None,
                }))
            }
            Err(e) => Err(e),
        }
    }
}
