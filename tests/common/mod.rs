//! Shared fixtures for pr-autoupdate tests

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use pr_autoupdate::config::Config;
use pr_autoupdate::output::{CONFLICTED, OutputSink};
use pr_autoupdate::types::{
    AutoMerge, BranchRef, Label, Owner, PrState, PullRequestSnapshot, RepoRef,
};
use std::sync::Mutex;
use std::time::Duration;

/// Config with test-friendly defaults (no retry backoff)
pub fn test_config() -> Config {
    Config {
        retry_sleep: Duration::ZERO,
        git_ref: Some("refs/heads/main".to_string()),
        repository: Some("o/r".to_string()),
        ..Config::default()
    }
}

/// An open, non-draft PR #`number` from `o/r:f{number}` into `main`, no labels
pub fn make_pull(number: u64) -> PullRequestSnapshot {
    PullRequestSnapshot {
        number,
        state: PrState::Open,
        merged: Some(false),
        draft: Some(false),
        head: BranchRef {
            ref_name: format!("f{number}"),
            label: Some(format!("o:f{number}")),
            repo: Some(RepoRef::new("o", "r")),
        },
        base: BranchRef {
            ref_name: "main".to_string(),
            label: Some("o:main".to_string()),
            repo: Some(RepoRef::new("o", "r")),
        },
        labels: Vec::new(),
        auto_merge: None,
    }
}

/// PR with the given label names
pub fn make_labelled_pull(number: u64, labels: &[&str]) -> PullRequestSnapshot {
    PullRequestSnapshot {
        labels: labels.iter().map(|l| Label::named(*l)).collect(),
        ..make_pull(number)
    }
}

/// PR whose head fork has been deleted
pub fn make_orphan_pull(number: u64) -> PullRequestSnapshot {
    let mut pull = make_pull(number);
    pull.head.repo = None;
    pull
}

/// PR with auto-merge enabled
pub fn make_auto_merge_pull(number: u64) -> PullRequestSnapshot {
    PullRequestSnapshot {
        auto_merge: Some(AutoMerge {
            enabled_by: Some(Owner {
                login: "testuser".to_string(),
            }),
            merge_method: Some("squash".to_string()),
        }),
        ..make_pull(number)
    }
}

/// Output sink recording everything it receives
#[derive(Debug, Default)]
pub struct RecordingOutput {
    outputs: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values set for the `conflicted` output, in order
    pub fn conflicted_values(&self) -> Vec<bool> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == CONFLICTED)
            .map(|(_, value)| value == "true")
            .collect()
    }

    /// Failure messages reported
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingOutput {
    fn set_output(&self, name: &str, value: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}
