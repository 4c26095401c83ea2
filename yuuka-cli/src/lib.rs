//! Command line layer of yuukafetch.
//!
//! Reads the config file, merges it with the command line flags and runs the `fetch` and `pick`
//! commands on top of [`yuuka_core`].
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
