//! End-to-end scanning through the public API

use crate::common::{write_file, RecordingDispatcher, APEX_RULES, FAILING_RULES};
use patchalert::alerts::api::{LastAlertDedup, Severity};
use patchalert::plugin::api::{
    CommitPlugin, FilenamePattern, FilenamePreset, PluginError, ScanningPlugin,
};
use patchalert::rules::api::ReloadPolicy;
use patchalert::watcher::api::{deliver_commit, CommitEvent, DeliveryStats};
use std::sync::Arc;

fn plugin_for(
    rule_file: std::path::PathBuf,
    policy: ReloadPolicy,
) -> (ScanningPlugin, Arc<RecordingDispatcher>) {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let plugin = ScanningPlugin::builder(
        "apex",
        FilenamePattern::from_preset(FilenamePreset::ClsSource).unwrap(),
    )
    .rule_file(rule_file, policy)
    .dispatcher(dispatcher.clone())
    .deduplicator(Arc::new(LastAlertDedup::new()))
    .recipients(vec!["security@example.com".to_string()])
    .build()
    .unwrap();
    (plugin, dispatcher)
}

#[tokio::test]
async fn test_commit_with_mixed_files() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "apex.json", APEX_RULES);
    let (plugin, dispatcher) = plugin_for(rules, ReloadPolicy::EveryCall);

    let commit = CommitEvent::new("9f8e7d", "https://scm.example.com/c/9f8e7d")
        .with_patch(
            "force-app/classes/Login.cls",
            [
                "public without sharing class Login {",
                "    System.debug('pw=' + userPassword);",
                "    Database.query('SELECT Id FROM ' + table);",
                "}",
            ],
        )
        .with_patch("static/app.js", ["console.log(password);"])
        .with_patch("force-app/classes/Util.apex", ["Integer i = 0;"]);

    let stats = deliver_commit(&plugin, "acme/payments", &commit).await;

    assert_eq!(
        stats,
        DeliveryStats {
            patches: 3,
            failures: 0
        }
    );
    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0].0.subject,
        "[Providence Email Alert] - Class runs without sharing in 9f8e7d"
    );
    assert_eq!(sent[0].0.severity, Severity::Medium);
    assert_eq!(
        sent[1].0.subject,
        "[Providence Email Alert] - Password written to debug log in 9f8e7d"
    );
    assert!(sent[1]
        .0
        .message_html
        .contains("System.debug(&#39;pw=&#39; + userPassword);"));
    assert!(sent[1]
        .0
        .message_html
        .ends_with("FILE NAME<br/>force-app/classes/Login.cls"));
}

#[tokio::test]
async fn test_every_call_policy_sees_rule_edits() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "apex.json", FAILING_RULES);
    let (plugin, _) = plugin_for(rules.clone(), ReloadPolicy::EveryCall);

    assert!(matches!(
        plugin.self_test().await,
        Err(PluginError::Validation { .. })
    ));

    std::fs::write(&rules, APEX_RULES).unwrap();
    assert!(plugin.self_test().await.unwrap().success);
}

#[tokio::test]
async fn test_cached_policy_until_invalidated() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "apex.json", APEX_RULES);
    let (plugin, _) = plugin_for(rules.clone(), ReloadPolicy::Cached);

    assert!(plugin.self_test().await.unwrap().success);

    std::fs::write(&rules, FAILING_RULES).unwrap();
    assert!(plugin.self_test().await.unwrap().success);

    plugin.invalidate_rules();
    assert!(matches!(
        plugin.self_test().await,
        Err(PluginError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_rule_file_with_invalid_regex() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(
        &dir,
        "apex.json",
        r#"[{"id": "broken", "pattern": "System\\.debug\\("}]"#,
    );
    let (plugin, dispatcher) = plugin_for(rules, ReloadPolicy::EveryCall);
    let commit = CommitEvent::new("1", "https://scm.example.com/c/1")
        .with_patch("Foo.cls", ["System.debug(x);"]);

    match plugin.patch("acme", &commit.patches()[0]).await {
        Err(PluginError::Configuration { message, .. }) => {
            assert!(message.contains("broken"), "message: {}", message)
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
    assert!(dispatcher.sent().is_empty());
}

#[tokio::test]
async fn test_preset_filters_ui_components() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "ui.json", r#"[{"id": "unescaped", "pattern": "escape=\"false\""}]"#);
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let plugin = ScanningPlugin::builder(
        "aura-cmp",
        FilenamePattern::from_preset(FilenamePreset::AuraCmpUiSource).unwrap(),
    )
    .rule_file(rules, ReloadPolicy::Cached)
    .dispatcher(dispatcher.clone())
    .deduplicator(Arc::new(LastAlertDedup::new()))
    .recipients(vec!["ui@example.com".to_string()])
    .build()
    .unwrap();

    let line = "<ui:outputText value=\"{!v.body}\" escape=\"false\"/>";
    let commit = CommitEvent::new("2", "https://scm.example.com/c/2")
        .with_patch("aura/card/card.cmp", [line])
        .with_patch("auradocs/card/cardExample.cmp", [line])
        .with_patch("aura/outputRichText/outputRichText.cmp", [line]);

    deliver_commit(&plugin, "ui", &commit).await;

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.message_html.ends_with("aura/card/card.cmp"));
    assert_eq!(sent[0].1, vec!["ui@example.com".to_string()]);
}
