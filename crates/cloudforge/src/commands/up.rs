use super::{Context, iam, s3};
use cloudforge_cloud::ProvisionReport;
use colored::Colorize;
use std::time::Instant;

/// Run the IAM and S3 flows against one client, in that order.
///
/// The flows are independent: a failure in one does not stop the other.
pub async fn handle(ctx: &Context) -> anyhow::Result<ProvisionReport> {
    println!(
        "{} {} ({})",
        "Provisioning".blue(),
        ctx.config.project_name.cyan(),
        ctx.config.environment
    );
    let started = Instant::now();

    let client = ctx.client().await?;
    let mut report = ProvisionReport::new();

    println!();
    println!("{}", "[IAM]".bold());
    iam::provision(client.clone(), &ctx.config, None, None, &mut report).await?;

    println!();
    println!("{}", "[S3]".bold());
    s3::provision(client, &ctx.config, None, false, &mut report).await;

    report.duration_ms = started.elapsed().as_millis() as u64;
    Ok(report)
}
