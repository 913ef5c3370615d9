//! Settings-driven plugin construction

use crate::common::{write_file, RecordingDispatcher, APEX_RULES};
use patchalert::plugin::api::{CommitPlugin, PluginError, PluginSettings, ScanningPlugin};
use patchalert::rules::api::ReloadPolicy;
use patchalert::watcher::api::{CommitEvent, WatcherKind};
use std::sync::Arc;

const SETTINGS: &str = r#"
product = "Acme Security"

[email]
to = "appsec@example.com"

[[repos]]
type = "perforce"
name = "//depot/core"

[[repos]]
type = "mercurial"
name = "legacy"

[rules]
reload = "cached"

[dedup]
strategy = "lru"
capacity = 8
"#;

#[tokio::test]
async fn test_apex_plugin_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(&dir, "patchalert.toml", SETTINGS);
    let rules = write_file(&dir, "apex.json", APEX_RULES);

    let settings = PluginSettings::load(Some(config.as_path())).await.unwrap();
    assert_eq!(settings.rules.reload, ReloadPolicy::Cached);
    assert_eq!(settings.recipients(), ["appsec@example.com".to_string()]);

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let plugin = ScanningPlugin::apex(rules, &settings, dispatcher.clone()).unwrap();

    let watchers = plugin.register_watchers(&settings.repos);
    assert_eq!(watchers[0].kind, WatcherKind::Perforce);
    assert_eq!(watchers[1].kind, WatcherKind::All);

    // LRU strategy: a repeat separated by another alert is still suppressed
    let commit = CommitEvent::new("42", "https://scm.example.com/c/42").with_patch(
        "Foo.cls",
        [
            "System.debug(userPassword);",
            "without sharing",
            "System.debug(userPassword);",
        ],
    );
    for patch in commit.patches() {
        plugin.patch("//depot/core", patch).await.unwrap();
    }

    let subjects: Vec<String> = dispatcher
        .sent()
        .into_iter()
        .map(|(alert, _)| alert.subject)
        .collect();
    assert_eq!(subjects.len(), 2);
    assert!(subjects[0].starts_with("[Acme Security Alert] - "));
}

#[tokio::test]
async fn test_missing_explicit_settings_file() {
    let dir = tempfile::tempdir().unwrap();

    let result = PluginSettings::load(Some(dir.path().join("absent.toml").as_path())).await;

    assert!(matches!(result, Err(PluginError::Configuration { .. })));
}

#[tokio::test]
async fn test_invalid_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(&dir, "patchalert.toml", "[dedup]\nstrategy = \"fifo\"\n");

    let result = PluginSettings::load(Some(config.as_path())).await;

    assert!(matches!(result, Err(PluginError::Configuration { .. })));
}
