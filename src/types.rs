//! Core types for pr-autoupdate
//!
//! Pull request types deserialize straight from GitHub's REST and webhook
//! JSON, so the same snapshot type serves the listing endpoint and the
//! `pull_request` event payload.

use serde::{Deserialize, Serialize};

/// Owner of a repository (user or organization)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    /// Login name
    pub login: String,
}

/// A repository reference as it appears on a PR head or base
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository name
    pub name: String,
    /// Repository owner
    pub owner: Owner,
}

impl RepoRef {
    /// Build a repo reference from owner login and name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: Owner {
                login: owner.into(),
            },
        }
    }

    /// Parse a fully-qualified `owner/repo` string
    ///
    /// Returns `None` unless there are exactly two non-empty segments.
    pub fn parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Some(Self::new(owner, name))
            }
            _ => None,
        }
    }

    /// Owner login
    pub fn owner_login(&self) -> &str {
        &self.owner.login
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner.login, self.name)
    }
}

/// One side (head or base) of a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// `owner:branch` label
    #[serde(default)]
    pub label: Option<String>,
    /// Repository holding the branch; `None` once a fork has been deleted
    #[serde(default)]
    pub repo: Option<RepoRef>,
}

impl BranchRef {
    /// Label used for comparisons, falling back to the branch name
    pub fn label_or_ref(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.ref_name)
    }
}

/// A label attached to a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name (tolerated missing)
    #[serde(default)]
    pub name: Option<String>,
}

impl Label {
    /// Create a named label
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Auto-merge marker set on a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoMerge {
    /// User who enabled auto-merge
    #[serde(default)]
    pub enabled_by: Option<Owner>,
    /// Merge method chosen for auto-merge
    #[serde(default)]
    pub merge_method: Option<String>,
}

/// Lifecycle state of a pull request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    #[default]
    Open,
    /// PR is closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Immutable view of one pull request at decision time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    /// PR number
    pub number: u64,
    /// Lifecycle state
    #[serde(default)]
    pub state: PrState,
    /// Whether the PR was merged (absent on list responses)
    #[serde(default)]
    pub merged: Option<bool>,
    /// Whether the PR is a draft
    #[serde(default)]
    pub draft: Option<bool>,
    /// Head side (the branch being updated)
    pub head: BranchRef,
    /// Base side (the branch merged in)
    pub base: BranchRef,
    /// Labels on the PR
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Auto-merge marker, present when auto-merge is enabled
    #[serde(default)]
    pub auto_merge: Option<AutoMerge>,
}

impl PullRequestSnapshot {
    /// Whether the PR has been merged
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(false)
    }

    /// Whether the PR is a draft
    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }

    /// Label names, skipping labels without a name
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().filter_map(|l| l.name.as_deref())
    }

    /// Whether any named label is in `set`
    pub fn has_any_label(&self, set: &[String]) -> bool {
        self.labels
            .iter()
            .any(|l| l.name.as_ref().is_some_and(|n| set.contains(n)))
    }
}

/// Result of comparing two refs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comparison {
    /// Number of commits behind
    pub behind_by: u64,
}

/// Successful outcome of a merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Base was merged into head, producing a new commit
    Merged {
        /// SHA of the merge commit
        sha: Option<String>,
    },
    /// Head already contained base, nothing to do
    AlreadyUpToDate,
}

/// Parameters of one merge-base-into-head call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Owner of the repository receiving the merge
    pub owner: String,
    /// Repository receiving the merge
    pub repo: String,
    /// Branch receiving the merge (the PR head)
    pub base: String,
    /// Branch being merged in (the PR base)
    pub head: String,
    /// Custom merge commit message
    pub commit_message: Option<String>,
}

/// One page of open pull requests
#[derive(Debug, Clone, Default)]
pub struct PullPage {
    /// Pull requests on this page
    pub items: Vec<PullRequestSnapshot>,
    /// Whether another page follows
    pub has_next: bool,
}
