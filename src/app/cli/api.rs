//! Public API exports for the CLI module

pub use crate::app::cli::args::{Args, Command, ScanArgs, SelfTestArgs};
