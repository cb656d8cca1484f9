use super::{Context, print_failure, print_outcome};
use cloudforge_cloud::{CloudClient, IdentityProvisioner, PolicyDocument, ProvisionReport};
use cloudforge_config::Config;
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

pub async fn handle(
    ctx: &Context,
    user: Option<&str>,
    policy: Option<&str>,
) -> anyhow::Result<ProvisionReport> {
    println!("{}", "Provisioning IAM resources...".blue());
    let started = Instant::now();

    let client = ctx.client().await?;
    let mut report = ProvisionReport::new();
    provision(client, &ctx.config, user, policy, &mut report).await?;

    report.duration_ms = started.elapsed().as_millis() as u64;
    Ok(report)
}

/// Ensure the user and the object-access policy, recording each step.
///
/// A failed step is recorded and the next one still runs.
pub async fn provision(
    client: Arc<dyn CloudClient>,
    config: &Config,
    user: Option<&str>,
    policy: Option<&str>,
    report: &mut ProvisionReport,
) -> anyhow::Result<()> {
    super::warn_if_not_portable(config);
    let identities = IdentityProvisioner::new(client, config.account_id.clone());

    let user_name = user.unwrap_or(&config.resources.user_name);
    match identities.ensure_user(user_name).await {
        Ok(ensured) => {
            print_outcome("IAM user", user_name, ensured.outcome);
            println!("  ARN: {}", ensured.resource.arn);
            report.record("iam-user", ensured.resource.arn.as_str(), ensured.outcome);
        }
        Err(e) => {
            print_failure("IAM user", user_name, &e);
            report.record_failure("iam-user", user_name, e);
        }
    }

    let policy_name = policy.unwrap_or(&config.resources.policy_name);
    let document = PolicyDocument::object_access(&config.resources.policy_resource).to_json()?;
    match identities.ensure_policy(policy_name, &document).await {
        Ok(ensured) => {
            print_outcome("IAM policy", policy_name, ensured.outcome);
            println!("  ARN: {}", ensured.resource.arn);
            report.record("iam-policy", ensured.resource.arn.as_str(), ensured.outcome);
        }
        Err(e) => {
            print_failure("IAM policy", policy_name, &e);
            report.record_failure("iam-policy", policy_name, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudforge_cloud::{InMemoryCloud, Operation, PolicyScope, RemoteErrorKind};

    #[tokio::test]
    async fn test_provision_twice_reports_existing() {
        let cloud = InMemoryCloud::new();
        let config = Config::default();

        let mut first = ProvisionReport::new();
        provision(Arc::new(cloud.clone()), &config, None, None, &mut first)
            .await
            .unwrap();
        assert_eq!(first.summary().created, 2);

        let mut second = ProvisionReport::new();
        provision(Arc::new(cloud.clone()), &config, None, None, &mut second)
            .await
            .unwrap();
        assert_eq!(second.summary().existing, 2);
        assert_eq!(first.entries[1].resource_id, second.entries[1].resource_id);

        let policies = cloud.list_policies(PolicyScope::Local).await.unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].name, "CloudForgeS3AccessPolicyV2");
    }

    #[tokio::test]
    async fn test_provision_uses_name_overrides() {
        let cloud = InMemoryCloud::new();
        let mut report = ProvisionReport::new();

        provision(
            Arc::new(cloud.clone()),
            &Config::default(),
            Some("ci-user"),
            Some("CiPolicy"),
            &mut report,
        )
        .await
        .unwrap();

        assert_eq!(
            report.entries[0].resource_id,
            "arn:aws:iam::000000000000:user/ci-user"
        );
        assert_eq!(
            report.entries[1].resource_id,
            "arn:aws:iam::000000000000:policy/CiPolicy"
        );
    }

    #[tokio::test]
    async fn test_failed_user_still_provisions_policy() {
        let cloud = InMemoryCloud::new();
        cloud
            .fail_next_with(Operation::CreateUser, RemoteErrorKind::Other("AccessDenied".into()))
            .await;

        let mut report = ProvisionReport::new();
        provision(Arc::new(cloud.clone()), &Config::default(), None, None, &mut report)
            .await
            .unwrap();

        assert!(!report.is_success());
        let summary = report.summary();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
    }
}
