use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use sandbox_reauth::config::{ReauthConfig, CONFIG_FILE};
use sandbox_reauth::console::StdinConsole;
use sandbox_reauth::external::{CommandBrowser, ProcessCommandExecutor, SfdxCli};
use sandbox_reauth::platform::RestClient;
use sandbox_reauth::telemetry::init_telemetry;
use sandbox_reauth::workflow::ReauthWorkflow;

#[derive(Parser)]
#[command(name = "sandbox-reauth")]
#[command(about = "Re-authorize a sandbox's API user against its connected app")]
#[command(
    long_about = "After a sandbox refresh the API user must re-authorize the connected app to \
                  act on its behalf. sandbox-reauth walks an operator through that procedure, \
                  automating the REST and CLI calls and pausing at the steps that need a human \
                  in a browser. Start with 'sandbox-reauth init' to write a config file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full re-authorization sequence against the configured sandbox
    Run,
    /// Write a starter configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            println!("sandbox-reauth automates the post-refresh connected-app re-authorization.");
            println!();
            println!("  sandbox-reauth init   write a starter {CONFIG_FILE}");
            println!("  sandbox-reauth run    execute the 8-step workflow");
            println!();
            println!("Edit {CONFIG_FILE} (or set SANDBOX_REAUTH__* env vars) before running.");
            Ok(())
        }
        Some(Commands::Run) => {
            tokio::runtime::Runtime::new()?.block_on(async { run_command().await })
        }
        Some(Commands::Init { force }) => init_command(force),
    }
}

async fn run_command() -> Result<()> {
    let _ = ReauthConfig::load_env_file();
    let config = ReauthConfig::load().with_context(|| {
        format!("could not load configuration; run 'sandbox-reauth init' to create {CONFIG_FILE}")
    })?;
    init_telemetry(&config.observability.log_level)?;

    let executor = Arc::new(ProcessCommandExecutor);
    let identity = Arc::new(SfdxCli::new(
        executor.clone(),
        Duration::from_secs(config.auth.token_timeout_seconds),
    ));
    let platform = Arc::new(RestClient::new(
        config.target.instance_url.clone(),
        config.target.api_version.clone(),
    ));
    let browser = Arc::new(CommandBrowser::new(
        config.browser.command.clone(),
        executor,
    ));
    let console = Arc::new(StdinConsole);

    let workflow = ReauthWorkflow::new(config, identity, platform, browser, console);
    match workflow.run().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_command(force: bool) -> Result<()> {
    if std::path::Path::new(CONFIG_FILE).exists() && !force {
        anyhow::bail!("{CONFIG_FILE} already exists; pass --force to overwrite");
    }

    ReauthConfig::default().save_to_file(CONFIG_FILE)?;
    println!("Wrote {CONFIG_FILE}");
    println!("Fill in the operator, api_user, and oauth sections before 'sandbox-reauth run'.");
    Ok(())
}
