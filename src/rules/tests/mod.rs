//! Rule engine tests


use crate::watcher::types::{CommitEvent, PatchEvent};

pub(crate) const PASSWORD_RULES: &str = r#"{
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
        "severity": "medium"
    }
}"#;

pub(crate) fn patch_with(lines: &[&str]) -> PatchEvent {
    let commit = CommitEvent::new("abc123", "https://scm.example.com/c/abc123")
        .with_patch("classes/Foo.cls", lines.iter().copied());
    commit.patches()[0].clone()
}
