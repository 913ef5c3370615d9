//! Command line arguments
//!
//! Global options are accepted before or after the subcommand.

use crate::plugin::api::FilenamePreset;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "patchalert")]
#[command(about = "Scan commit patches for risky lines and raise alerts")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Force colored output (overrides TTY detection)
    #[arg(long = "color", action = ArgAction::SetTrue, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", global = true, value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", global = true, value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check rule files against their own positive and negative fixtures
    SelfTest(SelfTestArgs),
    /// Scan files as the added lines of a single commit
    Scan(ScanArgs),
    /// List the watchers registered for the configured repositories
    Watchers,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SelfTestArgs {
    /// Rule set files (JSON)
    #[arg(long = "rules", value_name = "FILE", required = true, num_args = 1..)]
    pub rules: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ScanArgs {
    /// Rule set file (JSON)
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: PathBuf,

    /// Predefined filename filter
    #[arg(long = "preset", value_name = "NAME", conflicts_with = "pattern")]
    pub preset: Option<FilenamePreset>,

    /// Filename regex; every file is scanned when neither this nor --preset is given
    #[arg(long = "pattern", value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Commit identifier shown in alert subjects
    #[arg(long = "commit", value_name = "ID", default_value = "local")]
    pub commit: String,

    /// Commit URL linked from alerts
    #[arg(long = "url", value_name = "URL", default_value = "")]
    pub url: String,

    /// Repository name reported in logs
    #[arg(long = "repo", value_name = "NAME", default_value = "local")]
    pub repo: String,

    /// Alert recipient, overriding email.to from the configuration file
    #[arg(long = "to", value_name = "ADDRESS")]
    pub to: Vec<String>,

    /// Files whose lines are treated as added lines
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Color decision from flags and terminal detection
    pub fn use_color(&self, is_terminal: bool) -> bool {
        (self.color || is_terminal) && !self.no_color
    }

    /// Log file to write to, treating `none` as no file
    pub fn log_file_path(&self) -> Option<&str> {
        self.log_file
            .as_deref()
            .and_then(|path| path.to_str())
            .filter(|path| *path != "none")
    }
}
