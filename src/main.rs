#![deny(clippy::all)]
use clap::Parser;
use color_eyre::eyre::Result;
use log::{info, warn};
use owo_colors::OwoColorize;
use yuuka_cli::cli::commands::fetch::FetchOutcome;
use yuuka_cli::cli::{Cli, Commands};
use yuuka_cli::config::{self, Config};
use yuuka_cli::logging::{Console, init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    color_eyre::install()?;

    let config_path = config::locate(args.config.as_deref());

    let mut config = match &config_path {
        Some(path) => Config::read(path).await?,
        None => Config::default(),
    };
    args.apply_overrides(&mut config);

    let verbosity = Cli::verbosity(&config);
    init_logger(verbosity);

    match &config_path {
        Some(path) => info!("Using config {}", path.display()),
        None => warn!(
            "Can't find a {} or {} config file, running with an empty one",
            config::CONFIG_FILE,
            config::LEGACY_CONFIG_FILE
        ),
    }
    info!("{}: starting", yuuka_common::USER_AGENT);

    let console = Console::new(verbosity);

    match &args.mode {
        Commands::Fetch(cmd) => {
            if cmd.run(&config, &console).await? == FetchOutcome::Interrupted {
                console.line("Remaining downloads skipped".bold().yellow());
            }
        }
        Commands::Pick(cmd) => {
            cmd.run(&config, &console).await?;
        }
    }

    Ok(())
}
