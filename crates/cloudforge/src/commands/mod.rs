pub mod config;
pub mod iam;
pub mod s3;
pub mod up;

use anyhow::Context as _;
use cloudforge_cloud::{CloudClient, Outcome, ProvisionReport};
use cloudforge_cloud_aws::{AwsCloudClient, AwsSettings, StaticCredentials};
use cloudforge_config::Config;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration shared by every command
pub struct Context {
    pub config: Config,

    /// File the configuration came from; `None` means built-in defaults
    pub source: Option<PathBuf>,
}

impl Context {
    /// `--config` wins; otherwise discover a cloudforge.yaml or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (config, source) = match path {
            Some(path) => {
                let mut config = Config::load(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                config.apply_env_overrides();
                (config, Some(path.to_path_buf()))
            }
            None => Config::discover().context("failed to discover configuration")?,
        };

        match &source {
            Some(path) => tracing::debug!("Using config file: {}", path.display()),
            None => tracing::debug!("No config file found, using defaults"),
        }

        Ok(Self { config, source })
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.config.region.clone(),
            endpoint_url: self.config.endpoint_url.clone(),
            credentials: self
                .config
                .credentials
                .as_ref()
                .map(|c| StaticCredentials {
                    access_key_id: c.access_key_id.clone(),
                    secret_access_key: c.secret_access_key.clone(),
                }),
        }
    }

    /// The client is built once per run and handed to every provisioner.
    pub async fn client(&self) -> anyhow::Result<Arc<dyn CloudClient>> {
        let client = AwsCloudClient::connect(&self.aws_settings())
            .await
            .context("failed to configure the AWS client")?;
        Ok(Arc::new(client))
    }
}

pub fn print_outcome(resource_type: &str, resource_id: &str, outcome: Outcome) {
    match outcome {
        Outcome::Created => println!(
            "{} {} {} created",
            "✓".green().bold(),
            resource_type,
            resource_id.cyan()
        ),
        Outcome::Existing => println!(
            "{} {} {} already exists",
            "i".blue().bold(),
            resource_type,
            resource_id.cyan()
        ),
    }
}

pub fn print_failure(resource_type: &str, resource_id: &str, error: &dyn std::fmt::Display) {
    eprintln!(
        "{} {} {}: {}",
        "✗".red().bold(),
        resource_type,
        resource_id.cyan(),
        error
    );
}

/// Prints a ⚠ line when the placeholder account meets a non-local endpoint.
pub fn warn_if_not_portable(config: &Config) -> bool {
    if config.check_account_portability() {
        return false;
    }
    println!(
        "{}",
        "⚠ account_id is the LocalStack placeholder but the endpoint is not local".yellow()
    );
    true
}

pub fn print_summary(report: &ProvisionReport) {
    println!();
    let summary = report.summary();
    if report.is_success() {
        println!("{}", format!("✓ {}", summary).green().bold());
        for entry in report.warnings() {
            println!("  ⚠ {} {}", entry.resource_type, entry.resource_id.cyan());
        }
    } else {
        println!("{}", format!("✗ {}", summary).red().bold());
        for entry in report.failures() {
            println!("  - {} {}", entry.resource_type, entry.resource_id.cyan());
        }
    }
    tracing::debug!("Provisioning took {}ms", report.duration_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudforge_config::Credentials;

    #[test]
    fn test_aws_settings_from_config() {
        let ctx = Context {
            config: Config {
                region: "eu-central-1".to_string(),
                endpoint_url: None,
                credentials: Some(Credentials {
                    access_key_id: "AKIA".to_string(),
                    secret_access_key: "secret".to_string(),
                }),
                ..Config::default()
            },
            source: None,
        };

        let settings = ctx.aws_settings();
        assert_eq!(settings.region, "eu-central-1");
        assert_eq!(settings.endpoint_url, None);
        let credentials = settings.credentials.unwrap();
        assert_eq!(credentials.access_key_id, "AKIA");
        assert_eq!(credentials.secret_access_key, "secret");
    }

    #[test]
    fn test_non_portable_account_is_flagged() {
        let remote = Config {
            endpoint_url: None,
            ..Config::default()
        };
        assert!(warn_if_not_portable(&remote));
        assert!(!warn_if_not_portable(&Config::default()));
    }

    #[test]
    fn test_aws_settings_without_credentials() {
        let ctx = Context {
            config: Config {
                credentials: None,
                ..Config::default()
            },
            source: None,
        };

        let settings = ctx.aws_settings();
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert!(settings.credentials.is_none());
    }
}
