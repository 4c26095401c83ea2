use std::process::exit;
use std::sync::Arc;

use clap::Args;
use log::{error, info, warn};
use owo_colors::OwoColorize;
use tokio::signal::ctrl_c;
use tokio::spawn;
use yuuka_common::build_client;
use yuuka_core::CancellationToken;
use yuuka_core::downloader::{DownloadSummary, Downloader, DownloaderOpts, StopReason};
use yuuka_core::progress::SharedProgressListener;
use yuuka_core::progress_bars::ProgressReporter;
use yuuka_core::transfer::{HttpTransfer, SharedTransfer};
use yuuka_extractors::prelude::*;

use crate::config::{Config, Profile};
use crate::error::CliError;
use crate::logging::Console;

/// Exit status used when a second interrupt kills the program.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Args)]
pub struct Fetch {
    /// Only run this download, even if it's not marked for autodownload
    #[clap(short, long, value_name = "NAME")]
    pub download: Option<String>,

    /// Number of simultaneous downloads
    ///
    /// [default: number of CPUs]
    #[clap(
        short,
        long,
        value_name = "NUMBER",
        value_parser(clap::value_parser!(u16).range(1..)),
        help_heading = "DOWNLOAD"
    )]
    pub threads: Option<u16>,
}

/// How the whole `fetch` run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every selected download went through.
    Finished,
    /// The user interrupted a download. The ones after it were not started.
    Interrupted,
}

impl Fetch {
    pub fn concurrency(&self, config: &Config) -> usize {
        self.threads
            .map(usize::from)
            .or(config.threads)
            .unwrap_or_else(num_cpus::get)
    }

    /// Runs every selected download profile, one after the other.
    ///
    /// Stops at the first failing profile.
    pub async fn run(&self, config: &Config, console: &Console) -> Result<FetchOutcome, CliError> {
        if config.downloads.is_empty() {
            return Err(CliError::NoProfiles);
        }

        if let Some(name) = &self.download {
            if config.profile(name).is_none() {
                return Err(CliError::UnknownProfile { name: name.clone() });
            }
        }

        let client = build_client()?;

        let options = GelbooruOptions {
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            user_id: config.user_id.filter(|id| *id != 0),
        };
        let source: SharedPageSource = Arc::new(GelbooruApi::new(client.clone(), options));
        let transfer: SharedTransfer = Arc::new(HttpTransfer::new(client));
        let concurrency = self.concurrency(config);

        for profile in &config.downloads {
            if !profile.is_selected(self.download.as_deref()) {
                console.line(format!("Skipping \"{}\"", profile.name));
                info!("Skipping {}", profile.name);
                continue;
            }

            console.line(format!("Downloading \"{}\"", profile.name.bold()));
            info!("Downloading {}", profile.name);

            let downloader = Downloader::new(
                source.clone(),
                transfer.clone(),
                DownloaderOpts {
                    output_dir: profile.output_dir.clone(),
                    check_dirs: profile.check_dirs(),
                    concurrency,
                },
                progress_listener(console),
            );

            let summary = run_profile(&downloader, profile).await?;
            print_summary(console, &summary);

            if summary.stop == StopReason::Cancelled {
                info!("Caught interrupt, not starting the remaining downloads");
                return Ok(FetchOutcome::Interrupted);
            }
        }

        Ok(FetchOutcome::Finished)
    }
}

fn progress_listener(console: &Console) -> Option<SharedProgressListener> {
    if console.verbosity().shows_progress() {
        Some(Arc::new(ProgressReporter::new(0)))
    } else {
        None
    }
}

async fn run_profile(downloader: &Downloader, profile: &Profile) -> Result<DownloadSummary, CliError> {
    let cancel = CancellationToken::new();
    let watcher = spawn(watch_interrupts(cancel.clone()));

    let result = downloader.download(&profile.query(), &cancel).await;
    watcher.abort();

    result.map_err(|source| {
        error!("Downloader failed for \"{}\": {}", profile.name, source);
        if source.is_missing_directory() {
            warn!(
                "Ensure that the output directory {} exists",
                profile.output_dir.display()
            );
        }

        CliError::Download {
            name: profile.name.clone(),
            source,
        }
    })
}

/// First interrupt asks the download to finish what it started, a second one exits right away.
async fn watch_interrupts(cancel: CancellationToken) {
    if let Err(error) = ctrl_c().await {
        warn!("Unable to listen for interrupts: {}", error);
        return;
    }

    info!("Caught interrupt, finishing");
    cancel.cancel();

    if ctrl_c().await.is_ok() {
        warn!("Caught second interrupt, exiting");
        exit(INTERRUPTED_EXIT_CODE);
    }
}

fn print_summary(console: &Console, summary: &DownloadSummary) {
    console.line(format!(
        "{} {} {}, {} {}",
        summary.downloaded.to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold(),
        summary.found.to_string().bold().green(),
        "already present".bold()
    ));

    if summary.stop == StopReason::Cancelled {
        console.line("Interrupted".bold().yellow());
    }
}
