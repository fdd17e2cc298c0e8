//! Status command implementation

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::output::json;

fn show(label: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("{} {}: {}", "✓".green(), label, value),
        None => println!("{} {}: {}", "○".dimmed(), label, "not set".dimmed()),
    }
}

/// Run the status command to display the effective configuration
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let path = opts.config_path()?;
    let config = Config::load_or_default(Some(&path))?;

    if opts.format == OutputFormat::Json {
        println!("{}", json::format_json(&config)?);
        return Ok(());
    }

    println!("{}\n", "cdprov Configuration Status".bold());

    if path.exists() {
        println!("Config file: {}", path.display().to_string().cyan());
    } else {
        println!("{} Configuration not found at {}", "✗".red(), path.display());
        println!("  → Run 'cdprov setup ... --save' to create one");
    }
    println!();

    let azure = &config.azure;
    println!("{}", "Azure".bold());
    show("Resource group", azure.resource_group.as_deref());
    show("Web app", azure.site_name.as_deref());
    show("Subscription", azure.subscription_id.as_deref());
    show("Tenant", azure.tenant_id.as_deref());
    show("Location", azure.location.as_deref());
    println!();

    println!("{}", "Source".bold());
    show("Repository", config.repository.url.as_deref());
    show("Branch", config.repository.branch.as_deref());
    show("App type", config.app.app_type.as_deref());
    println!();

    println!("{}", "Team Services".bold());
    show("Account", config.account.name.as_deref());
    println!(
        "{} Region: {}{}",
        "○".dimmed(),
        config.account.region,
        if config.account.create {
            " (created when missing)"
        } else {
            ""
        }
    );
    println!(
        "{} Polling every {}s, {} checks max",
        "○".dimmed(),
        config.polling.interval_secs,
        config.polling.max_attempts
    );

    let endpoints = config.endpoints.resolve();
    if config.endpoints.accounts_host.is_some() || config.endpoints.cd_host.is_some() {
        println!(
            "{} Custom endpoints: {} {}",
            "○".dimmed(),
            endpoints.accounts_host.cyan(),
            endpoints.cd_host.cyan()
        );
    }
    println!();

    Ok(())
}
