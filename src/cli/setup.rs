//! Setup command implementation

use std::sync::Arc;

use colored::Colorize;
use log::debug;

use crate::build_config::AppTypeDetails;
use crate::cli::args::GlobalOptions;
use crate::cli::{OutputFormat, SetupArgs, prompt_secret};
use crate::client::VstsClient;
use crate::client::models::Credential;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::models::SummaryRow;
use crate::output::{self, json};
use crate::progress::ProgressBarReporter;
use crate::provision::{
    AzureTargetInfo, Orchestrator, ProvisioningResult, RepositoryInfo, SetupRequest, cancellation,
};

fn override_with(slot: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        slot.clone_from(value);
    }
}

/// Layer the command line over the config file
pub fn effective_config(args: &SetupArgs, mut config: Config) -> Config {
    let azure = &mut config.azure;
    override_with(&mut azure.resource_group, &args.resource_group);
    override_with(&mut azure.site_name, &args.site_name);
    override_with(&mut azure.subscription_id, &args.subscription_id);
    override_with(&mut azure.subscription_name, &args.subscription_name);
    override_with(&mut azure.tenant_id, &args.tenant_id);
    override_with(&mut azure.location, &args.location);

    override_with(&mut config.repository.url, &args.repo_url);
    override_with(&mut config.repository.branch, &args.branch);

    let app = &mut config.app;
    override_with(&mut app.app_type, &args.app_type);
    override_with(&mut app.nodejs_task_runner, &args.nodejs_task_runner);
    override_with(&mut app.python_framework, &args.python_framework);
    override_with(&mut app.python_version, &args.python_version);
    override_with(&mut app.working_directory, &args.working_directory);

    override_with(&mut config.account.name, &args.account);
    if let Some(region) = &args.region {
        config.account.region = region.clone();
    }
    config.account.create |= args.create_account;

    if let Some(interval) = args.poll_interval {
        config.polling.interval_secs = interval;
    }
    override_with(&mut config.endpoints.accounts_host, &args.accounts_host);
    override_with(&mut config.endpoints.cd_host, &args.cd_host);

    config
}

fn required(value: &Option<String>, name: &'static str) -> Result<String> {
    value
        .clone()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField(name).into())
}

/// Build the run's request from the effective config and the secrets
pub fn setup_request(
    args: &SetupArgs,
    config: &Config,
    credential: Credential,
    auth_token: String,
) -> Result<SetupRequest> {
    let azure = &config.azure;
    let target = AzureTargetInfo {
        resource_group: required(&azure.resource_group, "resource group")?,
        site_name: required(&azure.site_name, "site name")?,
        credential,
        subscription_id: required(&azure.subscription_id, "subscription id")?,
        subscription_name: required(&azure.subscription_name, "subscription name")?,
        tenant_id: required(&azure.tenant_id, "tenant id")?,
        location: required(&azure.location, "location")?,
    };

    let repository = RepositoryInfo {
        url: required(&config.repository.url, "repository url")?,
        branch: config.repository.branch.clone(),
        access_token: args.repo_token.clone(),
    };

    let app_type: AppTypeDetails = config.app.clone();

    Ok(SetupRequest {
        account_name: config.account.name.clone(),
        create_account: config.account.create,
        account_region: config.account.region.clone(),
        auth_token,
        deployment_slot: args.deployment_slot.clone(),
        test_webapp: args.test_webapp.clone(),
        ..SetupRequest::new(target, repository, app_type)
    })
}

/// Run the setup command
pub async fn run(opts: &GlobalOptions, args: &SetupArgs) -> Result<()> {
    let config = effective_config(args, opts.load_config()?);

    if args.save {
        let path = opts.config_path()?;
        config.save_to(&path)?;
        if opts.format == OutputFormat::Pretty {
            println!("{} Settings saved to {}", "✓".green(), path.display());
        }
    }

    let credential = args.credentials.resolve()?;
    let auth_token = match &args.auth_token {
        Some(token) => token.clone(),
        None => prompt_secret("Azure deployment auth token")?,
    };
    let request = setup_request(args, &config, credential.clone(), auth_token)?;

    let endpoints = config.endpoints.resolve();
    debug!("Using endpoints {:?}", endpoints);
    let client = Arc::new(VstsClient::new(credential, endpoints)?);

    let reporter = Arc::new(if opts.format == OutputFormat::Pretty {
        ProgressBarReporter::new()
    } else {
        ProgressBarReporter::hidden()
    });

    let (cancel, token) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let orchestrator = Orchestrator::new(client)
        .with_poll_policy(config.polling.policy())
        .with_progress(reporter.clone())
        .with_cancellation(token);

    if opts.format == OutputFormat::Pretty {
        println!(
            "{} {}",
            "Setting up continuous delivery for".cyan(),
            request.target.site_name.bold()
        );
    }

    let result = orchestrator.run(&request).await;
    reporter.finish();

    print_result(&result?, opts.format)
}

fn print_result(result: &ProvisioningResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(result)?),
        OutputFormat::Table => output::print_rows(&SummaryRow::from_result(result), format)?,
        OutputFormat::Pretty => {
            println!("{} {}", "✓".green(), result.status.green().bold());
            println!("{}", result.status_message);
            if let Some(url) = &result.build_definition_url {
                println!("  Build definition:   {}", url.cyan());
            }
            if let Some(url) = &result.release_definition_url {
                println!("  Release definition: {}", url.cyan());
            }
        }
    }
    Ok(())
}
