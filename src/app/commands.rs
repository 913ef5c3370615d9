//! Subcommand implementations

use crate::alerts::api::{AlertDispatcher, LogDispatcher};
use crate::app::cli::api::{ScanArgs, SelfTestArgs};
use crate::plugin::api::{
    CommitPlugin, FilenamePattern, FilenamePreset, PluginError, PluginResult, PluginSettings,
    ScanningPlugin,
};
use crate::plugin::scanning::self_test_rules;
use crate::rules::api::RuleSetLoader;
use crate::watcher::api::{deliver_commit, CommitEvent};
use colored::Colorize;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

const SCAN_PLUGIN: &str = "scan";

fn rule_set_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Self-test every rule file, printing one verdict per file
///
/// Rule files are checked on their own, so no recipients are needed.
pub fn self_test(args: &SelfTestArgs, settings: &PluginSettings) -> PluginResult<()> {
    let mut failed = Vec::new();

    for path in &args.rules {
        let name = rule_set_name(path);
        let loader = RuleSetLoader::new(path.clone(), settings.rules.reload);

        match self_test_rules(&name, &loader) {
            Ok(report) => {
                println!("{} {}", "PASS".green().bold(), path.display());
                debug!("{}: {}", name, report.report);
            }
            Err(e) => {
                println!("{} {}", "FAIL".red().bold(), path.display());
                for line in e.to_string().lines() {
                    println!("  {}", line);
                }
                failed.push(path.display().to_string());
            }
        }
    }

    if failed.is_empty() {
        return Ok(());
    }
    Err(PluginError::Validation {
        plugin_name: "self-test".to_string(),
        report: format!(
            "{} of {} rule files failed: {}",
            failed.len(),
            args.rules.len(),
            failed.join(", ")
        ),
    })
}

fn scan_pattern(args: &ScanArgs) -> PluginResult<FilenamePattern> {
    let pattern = match (&args.preset, &args.pattern) {
        (Some(preset), _) => FilenamePattern::from_preset(*preset),
        (None, Some(pattern)) => FilenamePattern::new(pattern),
        (None, None) => FilenamePattern::new(""),
    };
    pattern.map_err(|e| PluginError::configuration(SCAN_PLUGIN, e))
}

/// Scan local files as one synthetic commit, alerting through the log
pub async fn scan(args: &ScanArgs, settings: &PluginSettings) -> PluginResult<()> {
    let mut settings = settings.clone();
    if !args.to.is_empty() {
        settings.email.to = args.to.clone();
    }
    if settings.recipients().is_empty() {
        return Err(PluginError::configuration(
            SCAN_PLUGIN,
            "No alert recipients configured; set email.to or pass --to",
        ));
    }

    let mut commit = CommitEvent::new(args.commit.as_str(), args.url.as_str());
    for file in &args.files {
        let text = tokio::fs::read_to_string(file).await.map_err(|e| {
            PluginError::configuration(
                SCAN_PLUGIN,
                format!("Cannot read {}: {}", file.display(), e),
            )
        })?;
        commit = commit.with_patch(file.to_string_lossy(), text.lines());
    }

    let plugin = ScanningPlugin::from_settings(
        SCAN_PLUGIN,
        scan_pattern(args)?,
        Some(args.rules.clone()),
        &settings,
        Arc::new(LogDispatcher::new()) as Arc<dyn AlertDispatcher>,
    )?;
    let stats = deliver_commit(&plugin, &args.repo, &commit).await;
    info!(
        "{}: {} patches scanned, {} failed",
        SCAN_PLUGIN, stats.patches, stats.failures
    );

    if stats.failures > 0 {
        return Err(PluginError::configuration(
            SCAN_PLUGIN,
            format!("{} of {} patches failed", stats.failures, stats.patches),
        ));
    }
    Ok(())
}

/// Print the watcher each configured repository is registered with
pub fn watchers(settings: &PluginSettings) -> PluginResult<()> {
    let pattern = FilenamePattern::from_preset(FilenamePreset::ClsSource)
        .map_err(|e| PluginError::configuration("apex", e))?;
    let plugin = ScanningPlugin::builder("apex", pattern).build()?;

    let watchers = plugin.register_watchers(&settings.repos);
    if watchers.is_empty() {
        println!("No repositories configured");
    }
    for watcher in watchers {
        println!(
            "{:<10} {}",
            watcher.kind.to_string().cyan(),
            watcher.repo_name
        );
    }
    Ok(())
}
