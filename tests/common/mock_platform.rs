//! Mock forge service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_autoupdate::error::{Error, Result};
use pr_autoupdate::platform::ForgeService;
use pr_autoupdate::types::{Comparison, MergeOutcome, MergeRequest, PullPage, PullRequestSnapshot};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `compare_refs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareCall {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
}

/// Call record for `branch_protected`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCall {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Call record for `list_open_pulls`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub page: u32,
}

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub body: String,
}

/// Scripted response for one `merge_branch` call
#[derive(Debug, Clone)]
pub enum MergeResponse {
    /// 201 with a merge commit
    Merged,
    /// 204, nothing to merge
    UpToDate,
    /// Failure with an HTTP status and message
    Status(u16, String),
}

impl MergeResponse {
    pub fn status(status: u16, message: &str) -> Self {
        Self::Status(status, message.to_string())
    }

    pub fn conflict() -> Self {
        Self::status(409, "Merge conflict")
    }

    pub fn forbidden() -> Self {
        Self::status(403, "Must have admin rights to Repository.")
    }

    pub fn unavailable() -> Self {
        Self::status(503, "Service Unavailable")
    }
}

/// Simple mock forge service for testing
///
/// Features:
/// - Behind-by counts keyed by the PR head label
/// - Scripted merge responses consumed in order (default: merged)
/// - Pull request pages keyed by base branch
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockForgeService {
    default_behind_by: Mutex<u64>,
    behind_by: Mutex<HashMap<String, u64>>,
    protected_branches: Mutex<HashMap<String, bool>>,
    merge_script: Mutex<VecDeque<MergeResponse>>,
    pages: Mutex<HashMap<String, Vec<Vec<PullRequestSnapshot>>>>,
    // Call tracking
    compare_calls: Mutex<Vec<CompareCall>>,
    branch_calls: Mutex<Vec<BranchCall>>,
    merge_calls: Mutex<Vec<MergeRequest>>,
    list_calls: Mutex<Vec<ListCall>>,
    comment_calls: Mutex<Vec<CreateCommentCall>>,
    // Error injection
    error_on_compare: Mutex<Option<String>>,
    error_on_branch: Mutex<Option<String>>,
    error_on_list: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
}

impl Default for MockForgeService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForgeService {
    /// Create a mock where every PR is one commit behind
    pub fn new() -> Self {
        Self {
            default_behind_by: Mutex::new(1),
            behind_by: Mutex::new(HashMap::new()),
            protected_branches: Mutex::new(HashMap::new()),
            merge_script: Mutex::new(VecDeque::new()),
            pages: Mutex::new(HashMap::new()),
            compare_calls: Mutex::new(Vec::new()),
            branch_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            error_on_compare: Mutex::new(None),
            error_on_branch: Mutex::new(None),
            error_on_list: Mutex::new(None),
            error_on_comment: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Behind-by count for PRs without a specific response
    pub fn set_default_behind_by(&self, behind_by: u64) {
        *self.default_behind_by.lock().unwrap() = behind_by;
    }

    /// Behind-by count for the PR whose head label is `head_label`
    pub fn set_behind_by(&self, head_label: &str, behind_by: u64) {
        self.behind_by
            .lock()
            .unwrap()
            .insert(head_label.to_string(), behind_by);
    }

    /// Protection flag for `branch`
    pub fn set_protected(&self, branch: &str, protected: bool) {
        self.protected_branches
            .lock()
            .unwrap()
            .insert(branch.to_string(), protected);
    }

    /// Queue responses for the next `merge_branch` calls
    pub fn script_merges(&self, responses: impl IntoIterator<Item = MergeResponse>) {
        self.merge_script.lock().unwrap().extend(responses);
    }

    /// Pages returned when listing PRs against `base`
    pub fn set_pages(&self, base: &str, pages: Vec<Vec<PullRequestSnapshot>>) {
        self.pages.lock().unwrap().insert(base.to_string(), pages);
    }

    // === Error injection methods ===

    /// Make `compare_refs` return an error
    pub fn fail_compare(&self, msg: &str) {
        *self.error_on_compare.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `branch_protected` return an error
    pub fn fail_branch(&self, msg: &str) {
        *self.error_on_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_open_pulls` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr_comment` return an error
    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_compare_calls(&self) -> Vec<CompareCall> {
        self.compare_calls.lock().unwrap().clone()
    }

    pub fn get_branch_calls(&self) -> Vec<BranchCall> {
        self.branch_calls.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<MergeRequest> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn get_list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    /// Base branches listed, in call order (one entry per page)
    pub fn listed_bases(&self) -> Vec<String> {
        self.get_list_calls().into_iter().map(|c| c.base).collect()
    }

    /// Head labels compared, in call order
    pub fn compared_heads(&self) -> Vec<String> {
        self.get_compare_calls().into_iter().map(|c| c.base).collect()
    }

    /// Get count of `merge_branch` calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ForgeService for MockForgeService {
    async fn compare_refs(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison> {
        self.compare_calls.lock().unwrap().push(CompareCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            base: base.to_string(),
            head: head.to_string(),
        });

        if let Some(msg) = self.error_on_compare.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let behind_by = self
            .behind_by
            .lock()
            .unwrap()
            .get(base)
            .copied()
            .unwrap_or(*self.default_behind_by.lock().unwrap());
        Ok(Comparison { behind_by })
    }

    async fn branch_protected(&self, owner: &str, repo: &str, branch: &str) -> Result<bool> {
        self.branch_calls.lock().unwrap().push(BranchCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        });

        if let Some(msg) = self.error_on_branch.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let protected = self.protected_branches.lock().unwrap();
        Ok(protected.get(branch).copied().unwrap_or(false))
    }

    async fn merge_branch(&self, request: &MergeRequest) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(request.clone());

        let next = self.merge_script.lock().unwrap().pop_front();
        match next.unwrap_or(MergeResponse::Merged) {
            MergeResponse::Merged => Ok(MergeOutcome::Merged {
                sha: Some(format!("merged_sha_{}", self.merge_call_count())),
            }),
            MergeResponse::UpToDate => Ok(MergeOutcome::AlreadyUpToDate),
            MergeResponse::Status(status, message) => Err(Error::Api { status, message }),
        }
    }

    async fn list_open_pulls(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        page: u32,
    ) -> Result<PullPage> {
        self.list_calls.lock().unwrap().push(ListCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            base: base.to_string(),
            page,
        });

        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let pages = self.pages.lock().unwrap();
        let Some(branch_pages) = pages.get(base) else {
            return Ok(PullPage::default());
        };
        let index = (page as usize).saturating_sub(1);
        Ok(PullPage {
            items: branch_pages.get(index).cloned().unwrap_or_default(),
            has_next: index + 1 < branch_pages.len(),
        })
    }

    async fn create_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CreateCommentCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            pr_number,
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_comment.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }
}
