//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::client::models::Credential;
use crate::error::Result;

pub mod app_types;
pub mod args;
pub mod classify;
pub mod completions;
pub mod setup;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};

/// cdprov - set up continuous delivery for Azure web apps through Team Services
#[derive(Parser, Debug)]
#[command(name = "cdprov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "CDPROV_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "CDPROV_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CDPROV_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up continuous delivery for a web app
    #[command(after_help = "EXAMPLES:\n  \
        cdprov setup --resource-group group1 --site-name web1 --subscription-id <id> \\\n    \
        --subscription-name dev --tenant-id <id> --location \"South Central US\" \\\n    \
        --repo-url https://github.com/owner/repo --app-type NodeJS --nodejs-task-runner Gulp \\\n    \
        --account account1 --create-account")]
    Setup(SetupArgs),

    /// Show how a repository URL is classified
    Classify(ClassifyArgs),

    /// List supported app types and their options
    AppTypes,

    /// Show the effective configuration
    Status,

    /// Print the Team Services application id (Azure AD resource)
    AppId,

    /// Generate shell completions (static)
    #[command(after_help = "\
Static completions (subcommands/flags only):
  bash:   cdprov completion bash > /etc/bash_completion.d/cdprov
  zsh:    cdprov completion zsh > \"${fpath[1]}/_cdprov\"
  fish:   cdprov completion fish > ~/.config/fish/completions/cdprov.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Team Services credential, shared by commands that call the service
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Team Services personal access token
    #[arg(long, env = "CDPROV_PAT", hide_env_values = true, conflicts_with = "token")]
    pub pat: Option<String>,

    /// Azure AD access token for Team Services
    #[arg(long, env = "CDPROV_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl CredentialArgs {
    pub fn credential(&self) -> Option<Credential> {
        match (&self.pat, &self.token) {
            (Some(pat), _) => Some(Credential::from_pat(pat.as_str())),
            (None, Some(token)) => Some(Credential::from_bearer(token.as_str())),
            (None, None) => None,
        }
    }

    /// The given credential, or a PAT read from an interactive prompt
    pub fn resolve(&self) -> Result<Credential> {
        if let Some(credential) = self.credential() {
            return Ok(credential);
        }
        let pat = prompt_secret("Team Services personal access token")?;
        Ok(Credential::from_pat(pat))
    }
}

pub(crate) fn prompt_secret(prompt: &str) -> Result<String> {
    let secret = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()?;
    Ok(secret)
}

/// Arguments of `cdprov setup`; unset values come from the config file
#[derive(Debug, Clone, Default, Args)]
pub struct SetupArgs {
    /// Resource group of the web app
    #[arg(long, env = "CDPROV_RESOURCE_GROUP", hide_env = true)]
    pub resource_group: Option<String>,

    /// Name of the web app
    #[arg(long, env = "CDPROV_SITE_NAME", hide_env = true)]
    pub site_name: Option<String>,

    #[arg(long, env = "CDPROV_SUBSCRIPTION_ID", hide_env = true)]
    pub subscription_id: Option<String>,

    #[arg(long, env = "CDPROV_SUBSCRIPTION_NAME", hide_env = true)]
    pub subscription_name: Option<String>,

    #[arg(long, env = "CDPROV_TENANT_ID", hide_env = true)]
    pub tenant_id: Option<String>,

    /// Location of the web app, e.g. "South Central US"
    #[arg(long, env = "CDPROV_LOCATION", hide_env = true)]
    pub location: Option<String>,

    /// Source repository URL
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Branch to build (default refs/heads/master)
    #[arg(long)]
    pub branch: Option<String>,

    /// Access token for a GitHub repository
    #[arg(long, env = "CDPROV_REPO_TOKEN", hide_env_values = true)]
    pub repo_token: Option<String>,

    /// App type (AspNet, AspNetWap, AspNetCore, NodeJS, Python)
    #[arg(long)]
    pub app_type: Option<String>,

    /// NodeJS task runner (Gulp, Grunt, None)
    #[arg(long)]
    pub nodejs_task_runner: Option<String>,

    /// Python framework (Bottle, Django, Flask, None)
    #[arg(long)]
    pub python_framework: Option<String>,

    /// Python version, e.g. "Python 3.6.0 x64"
    #[arg(long)]
    pub python_version: Option<String>,

    /// Working directory of the app inside the repository
    #[arg(long)]
    pub working_directory: Option<String>,

    /// Team Services account name or URL
    #[arg(long, env = "CDPROV_ACCOUNT", hide_env = true)]
    pub account: Option<String>,

    /// Create the account if it does not exist
    #[arg(long)]
    pub create_account: bool,

    /// Region for a new account
    #[arg(long)]
    pub region: Option<String>,

    /// Deployment slot to swap into production from
    #[arg(long)]
    pub deployment_slot: Option<String>,

    /// Web app used as the load-test environment
    #[arg(long)]
    pub test_webapp: Option<String>,

    /// Token the service uses to deploy to Azure
    #[arg(long, env = "CDPROV_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Seconds between status checks
    #[arg(long, env = "CDPROV_POLL_INTERVAL", hide = true)]
    pub poll_interval: Option<u64>,

    #[arg(long, env = "CDPROV_ACCOUNTS_HOST", hide = true)]
    pub accounts_host: Option<String>,

    #[arg(long, env = "CDPROV_CD_HOST", hide = true)]
    pub cd_host: Option<String>,

    /// Save the non-secret settings to the config file
    #[arg(long)]
    pub save: bool,
}

/// Arguments of `cdprov classify`
#[derive(Debug, Clone, Args)]
pub struct ClassifyArgs {
    /// Repository URL to classify
    pub url: String,

    /// Access token for a GitHub repository
    #[arg(long, env = "CDPROV_REPO_TOKEN", hide_env_values = true)]
    pub repo_token: Option<String>,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}
