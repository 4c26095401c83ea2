//! How chatty the program is.
use std::fmt::Display;

use env_logger::{Builder, Env};

/// Output level picked from the `verbose`/`quiet` flags. Quiet always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet,
    /// Progress line and short status lines.
    Normal,
    /// Log lines instead of the progress line.
    Verbose,
}

impl Verbosity {
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    /// The progress line would be garbled by log lines, so it only shows in normal mode.
    pub const fn shows_progress(self) -> bool {
        matches!(self, Self::Normal)
    }

    pub const fn default_filter(self) -> &'static str {
        match self {
            Self::Verbose => "info",
            Self::Normal | Self::Quiet => "warn",
        }
    }
}

/// Installs the global logger. `RUST_LOG` overrides the level picked from `verbosity`.
pub fn init_logger(verbosity: Verbosity) {
    Builder::from_env(Env::default().default_filter_or(verbosity.default_filter()))
        .format_timestamp(None)
        .init();
}

/// Sink for the short, human facing lines (profile headers, summaries).
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn line(&self, message: impl Display) {
        if self.verbosity == Verbosity::Normal {
            println!("{message}");
        }
    }
}
