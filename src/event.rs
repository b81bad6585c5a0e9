//! Triggering events
//!
//! The raw webhook payload is narrowed into an [`Event`] carrying only what
//! the updater needs for that event kind.

use crate::error::{Error, Result};
use crate::types::{PullRequestSnapshot, RepoRef};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Inner events a `workflow_run` may wrap and still be acted on
pub const WORKFLOW_RUN_EVENTS: &[&str] = &["push", "workflow_dispatch"];

/// A triggering event
#[derive(Debug, Clone)]
pub enum Event {
    /// Commits pushed to a ref
    Push {
        /// Pushed ref, e.g. `refs/heads/main`
        git_ref: String,
        /// Repository pushed to
        repo: RepoRef,
    },
    /// Manual workflow dispatch
    WorkflowDispatch {
        /// Ref the workflow was dispatched on
        git_ref: String,
        /// Repository
        repo: RepoRef,
    },
    /// Another workflow completed
    WorkflowRun {
        /// Event that triggered the upstream workflow
        event: String,
        /// Branch the upstream workflow ran on
        head_branch: Option<String>,
        /// Repository
        repo: RepoRef,
    },
    /// Cron schedule; branches come from configuration
    Schedule,
    /// Activity on a single pull request
    PullRequest {
        /// Webhook action (`opened`, `synchronize`, ...)
        action: Option<String>,
        /// The pull request in the payload
        pull: Box<PullRequestSnapshot>,
    },
}

#[derive(Deserialize)]
struct OwnerPayload {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

impl RepositoryPayload {
    fn into_repo_ref(self) -> Result<RepoRef> {
        let owner = self
            .owner
            .login
            .filter(|s| !s.is_empty())
            .or(self.owner.name)
            .ok_or_else(|| Error::Event("repository owner missing".to_string()))?;
        Ok(RepoRef::new(owner, self.name))
    }
}

#[derive(Deserialize)]
struct RefPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct WorkflowRunInfo {
    event: String,
    #[serde(default)]
    head_branch: Option<String>,
}

#[derive(Deserialize)]
struct WorkflowRunPayload {
    workflow_run: WorkflowRunInfo,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    #[serde(default)]
    action: Option<String>,
    pull_request: PullRequestSnapshot,
}

fn decode<T: DeserializeOwned>(name: &str, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::Event(format!("{name}: {e}")))
}

impl Event {
    /// Build an event from its name and JSON payload
    pub fn from_payload(name: &str, payload: serde_json::Value) -> Result<Self> {
        match name {
            "push" => {
                let p: RefPayload = decode(name, payload)?;
                Ok(Self::Push {
                    git_ref: p.git_ref,
                    repo: p.repository.into_repo_ref()?,
                })
            }
            "workflow_dispatch" => {
                let p: RefPayload = decode(name, payload)?;
                Ok(Self::WorkflowDispatch {
                    git_ref: p.git_ref,
                    repo: p.repository.into_repo_ref()?,
                })
            }
            "workflow_run" => {
                let p: WorkflowRunPayload = decode(name, payload)?;
                Ok(Self::WorkflowRun {
                    event: p.workflow_run.event,
                    head_branch: p.workflow_run.head_branch,
                    repo: p.repository.into_repo_ref()?,
                })
            }
            "schedule" => Ok(Self::Schedule),
            "pull_request" | "pull_request_target" => {
                let p: PullRequestPayload = decode(name, payload)?;
                Ok(Self::PullRequest {
                    action: p.action,
                    pull: Box::new(p.pull_request),
                })
            }
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }

    /// Read the payload at `path` and build the event
    pub fn from_file(name: &str, path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let payload: serde_json::Value = serde_json::from_str(&content)?;
        Self::from_payload(name, payload)
    }

    /// Short name for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::WorkflowDispatch { .. } => "workflow_dispatch",
            Self::WorkflowRun { .. } => "workflow_run",
            Self::Schedule => "schedule",
            Self::PullRequest { .. } => "pull_request",
        }
    }
}
