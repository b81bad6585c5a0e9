//! Merge execution with conflict handling and bounded retry
//!
//! Every terminal path sets the `conflicted` output exactly once.

use super::AutoUpdater;
use crate::config::ConflictAction;
use crate::error::Result;
use crate::output::CONFLICTED;
use crate::types::{MergeOutcome, MergeRequest};
use tracing::{error, info, warn};

impl AutoUpdater<'_> {
    /// Merge `request.head` into `request.base` for PR `pr_number`
    ///
    /// Returns `Ok(true)` when the branch is now current, `Ok(false)` when
    /// the update was skipped (forbidden, or a conflict under
    /// [`ConflictAction::Ignore`]). Conflicts under [`ConflictAction::Fail`]
    /// and transient failures that outlive the retry budget are returned as
    /// errors.
    pub async fn merge(
        &self,
        acting_owner: &str,
        pr_number: u64,
        request: &MergeRequest,
    ) -> Result<bool> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.platform.merge_branch(request).await {
                Ok(outcome) => {
                    match outcome {
                        MergeOutcome::Merged { sha } => {
                            info!(pr_number, sha = ?sha, "branch updated");
                        }
                        MergeOutcome::AlreadyUpToDate => {
                            info!(pr_number, "branch already up to date");
                        }
                    }
                    self.report_conflicted(false);
                    return Ok(true);
                }
                Err(e) if e.is_forbidden() => {
                    if acting_owner == request.owner {
                        warn!(pr_number, error = %e, "not permitted to update branch");
                    } else {
                        info!(
                            pr_number,
                            owner = %request.owner,
                            "cannot update branch on a fork owned by another user"
                        );
                    }
                    self.report_conflicted(false);
                    return Ok(false);
                }
                Err(e) if e.is_conflict() => {
                    self.report_conflicted(true);
                    self.comment_on_conflict(pr_number).await;
                    match self.config.conflict_action {
                        ConflictAction::Ignore => {
                            info!(pr_number, "merge conflict detected, skipping update");
                            return Ok(false);
                        }
                        ConflictAction::Fail => {
                            error!(pr_number, "merge conflict detected");
                            return Err(e);
                        }
                    }
                }
                Err(e) => {
                    if attempt > self.config.retry_count {
                        error!(pr_number, attempt, error = %e, "merge failed, retries exhausted");
                        self.report_conflicted(false);
                        return Err(e);
                    }
                    warn!(
                        pr_number,
                        attempt,
                        retry_in_ms = self.config.retry_sleep.as_millis(),
                        error = %e,
                        "merge failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_sleep).await;
                }
            }
        }
    }

    fn report_conflicted(&self, conflicted: bool) {
        self.outputs
            .set_output(CONFLICTED, if conflicted { "true" } else { "false" });
    }

    /// Post the configured conflict comment; failures only log
    async fn comment_on_conflict(&self, pr_number: u64) {
        let Some(ref body) = self.config.conflict_msg else {
            return;
        };
        let Some(repo) = self.config.repository() else {
            warn!(pr_number, "conflict comment configured but repository is unknown");
            return;
        };
        if let Err(e) = self
            .platform
            .create_pr_comment(repo.owner_login(), &repo.name, pr_number, body)
            .await
        {
            warn!(pr_number, error = %e, "failed to post conflict comment");
        }
    }
}
