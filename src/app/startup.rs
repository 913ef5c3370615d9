//! Application startup: arguments, logging, settings, then the subcommand

use crate::app::cli::api::{Args, Command};
use crate::app::commands;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, LogFormat};
use crate::core::version::{build_time, git_hash};
use crate::plugin::api::PluginSettings;
use clap::Parser;
use log::{debug, info};
use std::io::IsTerminal;

/// Run the binary and exit with its status code
pub fn startup() {
    let args = Args::parse();
    let use_color = args.use_color(std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let log_format = args
        .log_format
        .as_deref()
        .and_then(LogFormat::parse)
        .unwrap_or_default();
    let log_file = args.log_file_path();
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        log_format,
        log_file,
        use_color && log_file.is_none(),
    ) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "patchalert {} starting (build {} {})",
        env!("CARGO_PKG_VERSION"),
        git_hash(),
        build_time()
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: could not start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(run(args));
    std::process::exit(code);
}

async fn run(args: Args) -> i32 {
    let settings = match PluginSettings::load(args.config_file.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return 1;
        }
    };
    debug!("Settings: {:?}", settings);

    let (result, context) = match &args.command {
        Command::SelfTest(cmd) => (commands::self_test(cmd, &settings), "Self-test"),
        Command::Scan(cmd) => (commands::scan(cmd, &settings).await, "Scanning files"),
        Command::Watchers => (commands::watchers(&settings), "Registering watchers"),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            log_error_with_context(&e, context);
            1
        }
    }
}
