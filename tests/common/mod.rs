//! Common test utilities: rule fixtures and a recording dispatcher

#![allow(dead_code)]

use patchalert::alerts::api::{Alert, AlertDispatcher, AlertResult};
use std::path::PathBuf;
use std::sync::Mutex;

pub const APEX_RULES: &str = r#"{
    "debug-password": {
        "pattern": "System\\.debug\\(.*[Pp]assword.*\\)",
        "metadata": "Password written to debug log",
        "tests": {
            "positive": ["System.debug(userPassword);"],
            "negative": ["System.debug(userName);"]
        }
    },
    "without-sharing": {
        "pattern": "without\\s+sharing",
        "metadata": "Class runs without sharing",
        "severity": "medium",
        "tests": {"positive": ["public without sharing class Foo"]}
    },
    "soql-concat": {
        "pattern": "Database\\.query\\(.*\\+",
        "action": "disabled",
        "metadata": "Dynamic SOQL built by concatenation",
        "tests": {"positive": ["Database.query('SELECT Id FROM ' + t)"]}
    }
}"#;

pub const FAILING_RULES: &str = r#"[
    {
        "id": "debug-password",
        "pattern": "System\\.debug\\(.*[Pp]assword.*\\)",
        "tests": {"negative": ["System.debug(userPassword);"]}
    }
]"#;

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(Alert, Vec<String>)>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<(Alert, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn send(&self, alert: Alert, recipients: &[String]) -> AlertResult<()> {
        self.sent.lock().unwrap().push((alert, recipients.to_vec()));
        Ok(())
    }
}
