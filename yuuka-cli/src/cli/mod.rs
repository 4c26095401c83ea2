use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;

use self::commands::{fetch::Fetch, pick::Pick};

pub mod commands;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch arts from Gelbooru for every selected download
    Fetch(Fetch),
    /// Pick images of a download into its pick directory
    Pick(Pick),
}

#[derive(Parser, Debug)]
#[clap(name = "yuukafetch", author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub mode: Commands,

    /// Path to the config file
    #[clap(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Be very verbose (disables the progress line)
    #[clap(short, long, global = true, help_heading = "GENERAL")]
    pub verbose: bool,

    /// Be very quiet (disables the progress line)
    #[clap(short, long, global = true, help_heading = "GENERAL")]
    pub quiet: bool,

    /// Gelbooru API key
    #[clap(long, value_name = "KEY", global = true, help_heading = "GELBOORU")]
    pub api_key: Option<String>,

    /// Gelbooru user ID
    #[clap(long, value_name = "ID", global = true, help_heading = "GELBOORU")]
    pub user_id: Option<u64>,
}

impl Cli {
    /// Layers the flags given on the command line over the values of the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        config.verbose |= self.verbose;
        config.quiet |= self.quiet;

        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }

        if let Some(id) = self.user_id {
            config.user_id = Some(id);
        }

        if let Commands::Pick(pick) = &self.mode {
            if let Some(chooser) = &pick.chooser {
                config.chooser = Some(chooser.clone());
            }
        }
    }

    pub const fn verbosity(config: &Config) -> Verbosity {
        Verbosity::from_flags(config.verbose, config.quiet)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_flags_are_parsed() {
        let cli = Cli::try_parse_from(["yuukafetch", "fetch", "-d", "yuuka", "-t", "3", "-v"]).unwrap();

        let Commands::Fetch(fetch) = &cli.mode else {
            panic!("expected fetch");
        };
        assert_eq!(fetch.download.as_deref(), Some("yuuka"));
        assert_eq!(fetch.threads, Some(3));
        assert!(cli.verbose);
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(Cli::try_parse_from(["yuukafetch", "fetch", "-t", "0"]).is_err());
    }

    #[test]
    fn chooser_is_split_on_commas() {
        let cli = Cli::try_parse_from(["yuukafetch", "pick", "yuuka", "--chooser", "feh,-."]).unwrap();

        let Commands::Pick(pick) = &cli.mode else {
            panic!("expected pick");
        };
        assert_eq!(pick.name, "yuuka");
        assert_eq!(
            pick.chooser.as_deref(),
            Some(&["feh".to_string(), "-.".to_string()][..])
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "yuukafetch",
            "-q",
            "--api-key",
            "fromflag",
            "pick",
            "yuuka",
            "--chooser",
            "sxiv",
        ])
        .unwrap();

        let mut config = Config {
            verbose: true,
            api_key: Some("fromfile".to_string()),
            user_id: Some(7),
            ..Default::default()
        };
        cli.apply_overrides(&mut config);

        assert_eq!(config.api_key.as_deref(), Some("fromflag"));
        assert_eq!(config.user_id, Some(7));
        assert_eq!(config.chooser(), vec!["sxiv"]);
        assert_eq!(Cli::verbosity(&config), Verbosity::Quiet);
    }
}
