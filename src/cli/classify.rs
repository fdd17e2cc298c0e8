//! Classify command implementation

use colored::Colorize;

use crate::classify::{RepositoryClassifier, RepositoryProvider, match_rule};
use crate::client::models::Credential;
use crate::client::{Endpoints, VstsClient};
use crate::cli::{ClassifyArgs, OutputFormat};
use crate::error::Result;
use crate::models::RepositoryDisplay;
use crate::output::{self, json};

/// Classify a repository URL, looking it up when it is hosted in Team Services
pub async fn run(format: OutputFormat, args: &ClassifyArgs) -> Result<()> {
    let needs_lookup = match_rule(&args.url).provider == RepositoryProvider::VstsGit;

    // Only managed Git URLs are looked up; others never send the credential
    let credential = match args.credentials.credential() {
        Some(credential) => credential,
        None if needs_lookup => args.credentials.resolve()?,
        None => Credential::from_pat(String::new()),
    };

    let client = VstsClient::new(credential.clone(), Endpoints::default())?;
    let descriptor = RepositoryClassifier::new(&client)
        .classify(&args.url, args.repo_token.as_deref(), &credential)
        .await?;

    let display = RepositoryDisplay::from(&descriptor);
    match format {
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
        OutputFormat::Table => output::print_rows(&[display], format)?,
        OutputFormat::Pretty => {
            println!("{} {}", "Provider:".bold(), display.provider.cyan());
            println!("{} {}", "Identifier:".bold(), display.identifier);
            if descriptor.account_name.is_some() {
                println!("{} {}", "Account:".bold(), display.account);
            }
            if descriptor.project_name.is_some() {
                println!("{} {}", "Project:".bold(), display.project);
            }
        }
    }
    Ok(())
}
