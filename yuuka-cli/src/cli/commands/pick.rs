use std::path::{Path, PathBuf};

use clap::Args;
use dialoguer::{Confirm, theme::ColorfulTheme};
use log::{debug, info};
use owo_colors::OwoColorize;
use rand::seq::SliceRandom;
use tokio::fs::{read_dir, rename};
use tokio::process::Command;

use crate::config::Config;
use crate::error::CliError;
use crate::logging::Console;

#[derive(Debug, Args)]
pub struct Pick {
    /// Name of the download to pick from
    #[clap(value_name = "NAME")]
    pub name: String,

    /// Command used to show every image, separated by commas. The image path is appended as its
    /// last argument
    #[clap(
        long,
        value_name = "CMD",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub chooser: Option<Vec<String>>,
}

/// What came out of a `pick` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PickSummary {
    pub shown: usize,
    pub kept: usize,
}

impl Pick {
    /// Shows the files of the download in random order and moves the ones to keep into its pick
    /// directory.
    pub async fn run(&self, config: &Config, console: &Console) -> Result<PickSummary, CliError> {
        let profile = config
            .profile(&self.name)
            .ok_or_else(|| CliError::UnknownProfile {
                name: self.name.clone(),
            })?;

        let pick_dir = profile
            .pick_dir
            .as_deref()
            .ok_or_else(|| CliError::NoPickDir {
                name: profile.name.clone(),
            })?;

        let chooser = config.chooser();
        if chooser.is_empty() {
            return Err(CliError::EmptyChooser);
        }

        let mut files = list_files(&profile.output_dir).await?;
        files.shuffle(&mut rand::thread_rng());
        info!("{} files to pick from in {}", files.len(), profile.output_dir.display());

        let mut summary = PickSummary::default();

        for file in files {
            let Some(name) = file.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };

            show(&chooser, &file).await?;
            summary.shown += 1;

            let keep = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Keep {}?", name))
                .interact()?;

            if keep {
                keep_file(&file, pick_dir).await?;
                summary.kept += 1;
            }
        }

        console.line(format!(
            "{} {} {}",
            summary.kept.to_string().bold().blue(),
            "files picked out of".bold(),
            summary.shown.to_string().bold().blue()
        ));

        Ok(summary)
    }
}

/// Regular files directly inside `dir`.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut entries = read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    Ok(files)
}

/// Runs the chooser on `file` and waits for it to exit.
pub async fn show(chooser: &[String], file: &Path) -> Result<(), CliError> {
    let (program, args) = chooser.split_first().ok_or(CliError::EmptyChooser)?;
    let command_line = || format!("{} {}", chooser.join(" "), file.display());

    debug!("Running {}", command_line());
    let status = Command::new(program)
        .args(args)
        .arg(file)
        .status()
        .await
        .map_err(|source| CliError::ChooserLaunch {
            command: command_line(),
            source,
        })?;

    if !status.success() {
        return Err(CliError::ChooserFailed {
            command: command_line(),
            status,
        });
    }

    Ok(())
}

/// Moves `file` into `pick_dir`, keeping its name.
pub async fn keep_file(file: &Path, pick_dir: &Path) -> Result<PathBuf, CliError> {
    let name = file.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let destination = pick_dir.join(name);

    debug!("Moving {} to {}", file.display(), destination.display());
    rename(file, &destination).await?;

    Ok(destination)
}
