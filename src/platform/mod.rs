//! Forge platform services
//!
//! Provides the capability surface the updater calls through: ref
//! comparison, branch metadata, the remote merge endpoint, paged pull
//! request listing and PR comments.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Comparison, MergeOutcome, MergeRequest, PullPage};
use async_trait::async_trait;

/// Platform service trait for the forge API
///
/// Implementations report failures as [`crate::error::Error`] values whose
/// [`status`](crate::error::Error::status) carries the HTTP code, which is
/// what the merge executor classifies on.
#[async_trait]
pub trait ForgeService: Send + Sync {
    /// Compare `base...head` in a repository
    async fn compare_refs(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison>;

    /// Whether a branch is protected
    async fn branch_protected(&self, owner: &str, repo: &str, branch: &str) -> Result<bool>;

    /// Merge `request.head` into `request.base`
    ///
    /// Errors carry the HTTP status: 403 forbidden, 409 conflict, anything
    /// else is treated as transient by callers.
    async fn merge_branch(&self, request: &MergeRequest) -> Result<MergeOutcome>;

    /// Fetch one page (1-based) of open PRs targeting `base`, oldest-updated first
    async fn list_open_pulls(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        page: u32,
    ) -> Result<PullPage>;

    /// Create a comment on a PR
    async fn create_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<()>;
}
