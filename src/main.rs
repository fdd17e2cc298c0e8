//! cdprov CLI - set up continuous delivery for Azure web apps

use clap::Parser;
use log::LevelFilter;

use cdprov::cli::{self, Cli, Commands, GlobalOptions, OutputFormat};
use cdprov::client::VSTS_APP_ID;
use cdprov::error::Result;
use cdprov::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Setup(args) => cli::setup::run(&opts, &args).await,
        Commands::Classify(args) => cli::classify::run(opts.format, &args).await,
        Commands::AppTypes => cli::app_types::run(opts.format),
        Commands::Status => cli::status::run(&opts),
        Commands::AppId => {
            if opts.format == OutputFormat::Json {
                println!("{}", json::format_json(&serde_json::json!({ "appId": VSTS_APP_ID }))?);
            } else {
                println!("{}", VSTS_APP_ID);
            }
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::write(shell, &mut std::io::stdout());
            Ok(())
        }
    }
}
