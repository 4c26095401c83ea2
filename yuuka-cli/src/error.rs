use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;
use yuuka_core::error::DownloaderError;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Config file {} is malformed: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file {} is malformed: {source}", .path.display())]
    ConfigParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("No downloads found, check your config file")]
    NoProfiles,

    #[error("Unknown download \"{name}\"")]
    UnknownProfile { name: String },

    #[error("Download \"{name}\" has no pick_dir set")]
    NoPickDir { name: String },

    #[error("Chooser command is empty")]
    EmptyChooser,

    #[error("Failed to launch chooser `{command}`: {source}")]
    ChooserLaunch { command: String, source: io::Error },

    #[error("Chooser `{command}` exited with {status}")]
    ChooserFailed { command: String, status: ExitStatus },

    #[error("Failed to write input to console: {source}")]
    DialoguerIOFail {
        #[from]
        source: dialoguer::Error,
    },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to set up the HTTP client: {source}")]
    ClientSetup {
        #[from]
        source: reqwest::Error,
    },

    #[error("Download \"{name}\" failed: {source}")]
    Download {
        name: String,
        source: DownloaderError,
    },
}
