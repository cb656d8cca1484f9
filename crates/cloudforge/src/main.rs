mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "cloudforge")]
#[command(about = "Idempotent IAM and S3 provisioning for LocalStack and AWS", long_about = None)]
struct Cli {
    /// Config file (defaults to cloudforge.yaml discovery)
    #[arg(long, global = true, env = "CLOUDFORGE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the IAM user and managed policy exist
    Iam {
        /// User name (overrides resources.user_name)
        #[arg(long)]
        user: Option<String>,
        /// Policy name (overrides resources.policy_name)
        #[arg(long)]
        policy: Option<String>,
    },
    /// Ensure the artifact bucket exists and upload a timestamped artifact
    S3 {
        /// Bucket name (overrides resources.bucket_name)
        #[arg(long)]
        bucket: Option<String>,
        /// Only ensure the bucket
        #[arg(long)]
        skip_upload: bool,
    },
    /// Run every provisioning flow
    Up,
    /// Show the loaded configuration
    Config,
    /// Show version information
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` when set, otherwise warnings and errors only.
fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let load = || commands::Context::load(cli.config.as_deref());

    let report = match cli.command {
        // No config needed
        Commands::Version => {
            println!("cloudforge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Config => {
            commands::config::handle(&load()?);
            return Ok(());
        }
        Commands::Iam { user, policy } => {
            commands::iam::handle(&load()?, user.as_deref(), policy.as_deref()).await?
        }
        Commands::S3 {
            bucket,
            skip_upload,
        } => commands::s3::handle(&load()?, bucket.as_deref(), skip_upload).await?,
        Commands::Up => commands::up::handle(&load()?).await?,
    };

    commands::print_summary(&report);
    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_log_filter_defaults_to_warn() {
        let filter = temp_env::with_var_unset("RUST_LOG", log_filter);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    #[serial]
    fn test_log_filter_honours_rust_log() {
        let filter = temp_env::with_var("RUST_LOG", Some("debug"), log_filter);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
