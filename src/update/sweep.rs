//! Per-PR orchestration, pagination and per-event fan-out

use super::AutoUpdater;
use crate::error::Result;
use crate::event::{Event, WORKFLOW_RUN_EVENTS};
use crate::types::{MergeRequest, PullRequestSnapshot, RepoRef};
use tracing::{error, info};

/// Prefix of refs that name a branch
const BRANCH_PREFIX: &str = "refs/heads/";

/// What one event run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    /// Number of pull requests updated by a sweep
    Swept(u64),
    /// Whether the single pull request of a PR event was updated
    PullRequest(bool),
}

impl AutoUpdater<'_> {
    /// Update one pull request if it is eligible
    ///
    /// Merge failures are reported through the failure channel and turn
    /// into `false`; they never reach the caller.
    pub async fn update(&self, acting_owner: &str, pull: &PullRequestSnapshot) -> bool {
        if !self.needs_update(pull).await {
            return false;
        }

        // Fork may have vanished between listing and acting
        let Some(ref head_repo) = pull.head.repo else {
            info!(pr_number = pull.number, "head repository gone, skipping");
            return false;
        };

        if self.config.dry_run {
            info!(pr_number = pull.number, "would update branch (dry run)");
            return true;
        }

        let request = MergeRequest {
            owner: head_repo.owner_login().to_string(),
            repo: head_repo.name.clone(),
            base: pull.head.ref_name.clone(),
            head: pull.base.ref_name.clone(),
            commit_message: self.config.merge_msg.clone(),
        };

        match self.merge(acting_owner, pull.number, &request).await {
            Ok(updated) => updated,
            Err(e) => {
                self.outputs.set_failed(&format!(
                    "Caught error running merge for PR #{}: {e}",
                    pull.number
                ));
                false
            }
        }
    }

    /// Update every open pull request targeting the branch `git_ref`
    ///
    /// Returns the number updated; 0 when `git_ref` is not a branch or the
    /// repository coordinates are empty. Listing errors propagate.
    pub async fn pulls(&self, git_ref: &str, repo: &str, owner: &str) -> Result<u64> {
        let Some(branch) = git_ref.strip_prefix(BRANCH_PREFIX).filter(|b| !b.is_empty()) else {
            info!(git_ref, "ref is not a branch, skipping");
            return Ok(0);
        };
        if repo.is_empty() || owner.is_empty() {
            error!(owner, repo, "invalid repository coordinates");
            return Ok(0);
        }

        info!(owner, repo, branch, "checking PRs against branch");
        let mut updated = 0;
        let mut page = 1;
        loop {
            let result = self
                .platform
                .list_open_pulls(owner, repo, branch, page)
                .await?;
            for pull in &result.items {
                if self.update(owner, pull).await {
                    updated += 1;
                }
            }
            if !result.has_next {
                break;
            }
            page += 1;
        }

        info!(branch, updated, "finished sweep");
        Ok(updated)
    }

    /// Handle a push to `git_ref`
    pub async fn handle_push(&self, git_ref: &str, repo: &RepoRef) -> Result<u64> {
        self.pulls(git_ref, &repo.name, repo.owner_login()).await
    }

    /// Handle a manual dispatch on `git_ref`
    pub async fn handle_workflow_dispatch(&self, git_ref: &str, repo: &RepoRef) -> Result<u64> {
        self.pulls(git_ref, &repo.name, repo.owner_login()).await
    }

    /// Handle completion of an upstream workflow
    pub async fn handle_workflow_run(
        &self,
        event: &str,
        head_branch: Option<&str>,
        repo: &RepoRef,
    ) -> Result<u64> {
        if !WORKFLOW_RUN_EVENTS.contains(&event) {
            error!(event, "workflow_run for unsupported event, skipping");
            return Ok(0);
        }
        let Some(branch) = head_branch.filter(|b| !b.is_empty()) else {
            error!("workflow_run has no head branch, skipping");
            return Ok(0);
        };
        self.pulls(
            &format!("{BRANCH_PREFIX}{branch}"),
            &repo.name,
            repo.owner_login(),
        )
        .await
    }

    /// Handle a scheduled run over the configured branches
    pub async fn handle_schedule(&self) -> Result<u64> {
        let Some(repo) = self.config.repository() else {
            error!(
                repository = ?self.config.repository,
                "repository must be in owner/repo form"
            );
            return Ok(0);
        };

        if self.config.schedule_branches.is_empty() {
            let git_ref = self.config.git_ref.as_deref().unwrap_or_default();
            return self.pulls(git_ref, &repo.name, repo.owner_login()).await;
        }

        let mut updated = 0;
        for branch in &self.config.schedule_branches {
            updated += self
                .pulls(
                    &format!("{BRANCH_PREFIX}{branch}"),
                    &repo.name,
                    repo.owner_login(),
                )
                .await?;
        }
        Ok(updated)
    }

    /// Handle an event on a single pull request
    pub async fn handle_pull_request(&self, pull: &PullRequestSnapshot) -> bool {
        let Some(ref head_repo) = pull.head.repo else {
            info!(pr_number = pull.number, "head repository gone, skipping");
            return false;
        };
        let updated = self.update(head_repo.owner_login(), pull).await;
        if updated {
            info!(pr_number = pull.number, "PR branch updated");
        } else {
            info!(pr_number = pull.number, "no changes made to PR branch");
        }
        updated
    }

    /// Dispatch `event` to its handler
    pub async fn run(&self, event: &Event) -> Result<RunSummary> {
        info!(event = event.kind(), "handling event");
        let summary = match event {
            Event::Push { git_ref, repo } => {
                RunSummary::Swept(self.handle_push(git_ref, repo).await?)
            }
            Event::WorkflowDispatch { git_ref, repo } => {
                RunSummary::Swept(self.handle_workflow_dispatch(git_ref, repo).await?)
            }
            Event::WorkflowRun {
                event,
                head_branch,
                repo,
            } => RunSummary::Swept(
                self.handle_workflow_run(event, head_branch.as_deref(), repo)
                    .await?,
            ),
            Event::Schedule => RunSummary::Swept(self.handle_schedule().await?),
            Event::PullRequest { action, pull } => {
                info!(action = ?action, pr_number = pull.number, "pull request event");
                RunSummary::PullRequest(self.handle_pull_request(pull).await)
            }
        };
        Ok(summary)
    }
}
