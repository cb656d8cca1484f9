use super::Context;
use colored::Colorize;

pub fn handle(ctx: &Context) {
    let config = &ctx.config;

    match &ctx.source {
        Some(path) => println!("Config file: {}", path.display().to_string().cyan()),
        None => println!("Config file: {}", "(built-in defaults)".dimmed()),
    }
    println!();
    println!("Project:     {}", config.project_name.cyan());
    println!("Environment: {}", config.environment);
    println!("Region:      {}", config.region);
    println!(
        "Endpoint:    {}",
        config.endpoint_url.as_deref().unwrap_or("(AWS default)")
    );
    println!("Account:     {}", config.account_id);
    println!(
        "Credentials: {}",
        if config.credentials.is_some() {
            "static keys"
        } else {
            "SDK default chain"
        }
    );

    println!();
    println!("Resources:");
    println!("  user:   {}", config.resources.user_name);
    println!("  policy: {} ({})", config.resources.policy_name, config.resources.policy_resource);
    println!("  bucket: {}", config.resources.bucket_name);

    if !config.tags.is_empty() {
        println!();
        println!("Tags:");
        for (key, value) in &config.tags {
            println!("  {}: {}", key, value);
        }
    }

    println!();
    super::warn_if_not_portable(config);
}
