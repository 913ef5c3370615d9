//! Plugin test helpers: recording dispatchers and counting rule engines

use crate::alerts::api::{
    Alert, AlertDispatcher, AlertError, AlertResult, LastAlertDedup,
};
use crate::plugin::patterns::{FilenamePattern, FilenamePreset};
use crate::plugin::scanning::ScanningPlugin;
use crate::rules::api::{
    MatchResult, RegexRuleEngine, RuleEngine, RuleEngineLoader, RuleResult, RuleSet,
    SelfTestReport,
};
use crate::watcher::types::PatchEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const RULES: &str = r#"{
    "debug-password": {
        "pattern": "System\\.debug\\(.*[Pp]assword.*\\)",
        "action": "alert",
        "metadata": "Password written to debug log",
        "tests": {
            "positive": ["System.debug(userPassword);"],
            "negative": ["System.debug(userName);"]
        }
    },
    "without-sharing": {
        "pattern": "without\\s+sharing",
        "metadata": "Class runs without sharing",
        "severity": "medium"
    }
}"#;

pub const BROKEN_FIXTURE_RULES: &str = r#"{
    "debug-password": {
        "pattern": "System\\.debug\\(.*[Pp]assword.*\\)",
        "tests": {"positive": ["System.debug(userName);"]}
    }
}"#;

/// Dispatcher keeping every alert it is given
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(Alert, Vec<String>)>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<(Alert, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|(alert, _)| alert.subject)
            .collect()
    }
}

#[async_trait::async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn send(&self, alert: Alert, recipients: &[String]) -> AlertResult<()> {
        self.sent.lock().unwrap().push((alert, recipients.to_vec()));
        Ok(())
    }
}

/// Dispatcher failing every send, counting attempts
#[derive(Default)]
pub struct FailingDispatcher {
    pub attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl AlertDispatcher for FailingDispatcher {
    async fn send(&self, _alert: Alert, _recipients: &[String]) -> AlertResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AlertError::Transport {
            transport: "smtp".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

/// Regex engine wrapper counting how often it is asked to match
pub struct CountingEngine {
    inner: RegexRuleEngine,
    pub match_calls: AtomicUsize,
}

impl RuleEngine for CountingEngine {
    fn match_lines(
        &self,
        lines: &[String],
        context: &PatchEvent,
        on_match: &mut dyn FnMut(MatchResult<'_>),
    ) {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.match_lines(lines, context, on_match);
    }

    fn self_test(&self) -> SelfTestReport {
        self.inner.self_test()
    }
}

/// Loader over a [`CountingEngine`], counting loads
pub struct CountingLoader {
    pub engine: Arc<CountingEngine>,
    pub loads: AtomicUsize,
}

impl CountingLoader {
    pub fn new(rules: &str) -> Arc<Self> {
        let rule_set = RuleSet::from_json_str(rules, "inline").unwrap();
        Arc::new(Self {
            engine: Arc::new(CountingEngine {
                inner: RegexRuleEngine::new(rule_set).unwrap(),
                match_calls: AtomicUsize::new(0),
            }),
            loads: AtomicUsize::new(0),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn match_calls(&self) -> usize {
        self.engine.match_calls.load(Ordering::SeqCst)
    }
}

impl RuleEngineLoader for CountingLoader {
    fn origin(&self) -> String {
        "counting".to_string()
    }

    fn load(&self) -> RuleResult<Arc<dyn RuleEngine>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone() as Arc<dyn RuleEngine>)
    }
}

/// Apex-style plugin with its own dedup marker and a recording dispatcher
pub fn apex_plugin(
    loader: Arc<CountingLoader>,
) -> (ScanningPlugin, Arc<RecordingDispatcher>, Arc<LastAlertDedup>) {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let dedup = Arc::new(LastAlertDedup::new());
    let plugin = ScanningPlugin::builder(
        "apex",
        FilenamePattern::from_preset(FilenamePreset::ClsSource).unwrap(),
    )
    .rules(loader)
    .dispatcher(dispatcher.clone())
    .deduplicator(dedup.clone())
    .recipients(vec!["security@example.com".to_string()])
    .build()
    .unwrap();
    (plugin, dispatcher, dedup)
}
