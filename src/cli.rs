// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `webforge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "webforge",
    version,
    about = "Build layered static-asset targets, optionally watching for changes.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Webforge.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Webforge.toml")]
    pub config: String,

    /// Build this target instead of the one named in the config file.
    ///
    /// The override goes through the same target-existence check as the
    /// configured target.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Watch the config file and all source directories after a successful
    /// build, rebuilding on changes.
    #[arg(long)]
    pub watch: bool,

    /// Write a zip archive of the build directory to this path once all
    /// tasks have completed. Example: `./app.zip`.
    #[arg(long, value_name = "PATH")]
    pub zip: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WEBFORGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Remove the build directory and exit.
    Clean,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
