//! Configuration file and download profiles.
//!
//! The config is a TOML file looked up in this order:
//! 1. The path given with `--config`
//! 2. `$YUUKAFETCH_CONFIG`
//! 3. The first `config.toml` found inside `.`, the user config dir, `~/.config/yuukafetch` and
//!    `/etc/yuukafetch`
//!
//! Older releases used a YAML `config.yaml`. It's still read, from the same places, when no
//! `config.toml` sits next to it.
use std::env;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use log::{debug, warn};
use serde::Deserialize;
use yuuka_common::item::Query;

use crate::error::CliError;

pub const CONFIG_ENV: &str = "YUUKAFETCH_CONFIG";
pub const CONFIG_FILE: &str = "config.toml";
pub const LEGACY_CONFIG_FILE: &str = "config.yaml";

/// Command used to show a file during `pick` when none is configured.
pub const DEFAULT_CHOOSER: [&str; 2] = ["feh", "-."];

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub verbose: bool,
    pub quiet: bool,
    pub api_key: Option<String>,
    pub user_id: Option<u64>,
    /// Simultaneous downloads. Falls back to the CPU count.
    pub threads: Option<usize>,
    pub chooser: Option<Vec<String>>,
    pub downloads: Vec<Profile>,
}

/// A named search with its own output directory.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub autodownload: bool,
    #[serde(default)]
    pub tags: String,
    /// Id of the newest post handled by a previous run. `0` disables it.
    #[serde(default, alias = "lastid")]
    pub last_id: u64,
    #[serde(alias = "outputdir")]
    pub output_dir: PathBuf,
    #[serde(default, alias = "pickdir")]
    pub pick_dir: Option<PathBuf>,
    #[serde(default, alias = "checkdirs")]
    pub check_dirs: Vec<PathBuf>,
}

impl Profile {
    pub fn query(&self) -> Query {
        Query::new(self.tags.as_str()).with_cutoff(self.last_id)
    }

    /// Whether `fetch` should run this profile.
    ///
    /// When a profile is requested by name, only that one runs, regardless of `autodownload`.
    pub fn is_selected(&self, requested: Option<&str>) -> bool {
        requested.map_or(self.autodownload, |name| self.name == name)
    }

    /// Output dir first, then the pick dir and the extra check dirs, skipping duplicates.
    pub fn check_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::with_capacity(self.check_dirs.len() + 1);

        for dir in self.pick_dir.iter().chain(self.check_dirs.iter()) {
            if *dir != self.output_dir && !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }

        dirs
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Reads and decodes the config at `path`. Files ending in `.yaml`/`.yml` are read as YAML.
    pub async fn read(path: &Path) -> Result<Self, CliError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })?;

        if is_yaml(path) {
            warn!(
                "Reading YAML config {}, consider moving it to {}",
                path.display(),
                CONFIG_FILE
            );
            return Self::from_yaml(&contents).map_err(|source| CliError::ConfigParseYaml {
                path: path.to_path_buf(),
                source,
            });
        }

        Self::from_toml(&contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.downloads.iter().find(|profile| profile.name == name)
    }

    pub fn chooser(&self) -> Vec<String> {
        self.chooser.clone().unwrap_or_else(|| {
            DEFAULT_CHOOSER
                .iter()
                .map(|arg| (*arg).to_string())
                .collect()
        })
    }
}

/// Finds which config file should be used, if any.
///
/// An explicit path or the environment variable is returned even if the file is missing, so
/// reading it reports the mistake instead of silently running without config.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            debug!("Using config from ${}", CONFIG_ENV);
            return Some(PathBuf::from(path));
        }
    }

    first_existing(&search_dirs())
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];

    if let Some(project) = ProjectDirs::from("", "", "yuukafetch") {
        dirs.push(project.config_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        let dotconfig = base.home_dir().join(".config").join("yuukafetch");
        if !dirs.contains(&dotconfig) {
            dirs.push(dotconfig);
        }
    }

    dirs.push(PathBuf::from("/etc/yuukafetch"));
    dirs
}

/// First config inside `dirs`, a `config.toml` winning over a `config.yaml` of the same dir.
fn first_existing(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| [dir.join(CONFIG_FILE), dir.join(LEGACY_CONFIG_FILE)])
        .find(|path| path.is_file())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
