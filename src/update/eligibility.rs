//! Eligibility decisions
//!
//! Checks run cheapest and most decisive first and stop at the first
//! failure. Lookup failures (compare, branch) count as "not eligible"
//! rather than errors.

use super::AutoUpdater;
use crate::config::{PrFilter, ReadyState};
use crate::types::{PrState, PullRequestSnapshot};
use tracing::{debug, info};

/// Why a pull request will not be updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Already merged
    Merged,
    /// Not open
    NotOpen(PrState),
    /// Head repository no longer exists
    HeadRepoDeleted,
    /// Comparing head and base failed
    CompareFailed(String),
    /// Head already contains base
    UpToDate,
    /// Carries an excluded label
    ExcludedLabel(String),
    /// Only drafts are updated and this is ready for review
    NotDraft,
    /// Only ready-for-review PRs are updated and this is a draft
    IsDraft,
    /// `labelled` filter with no labels configured
    NoLabelsConfigured,
    /// `labelled` filter and none of the configured labels present
    MissingLabel,
    /// Fetching the base branch failed
    BranchLookupFailed(String),
    /// `protected` filter and base branch unprotected
    BaseNotProtected,
    /// `auto_merge` filter and auto-merge disabled
    AutoMergeDisabled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged => write!(f, "already merged"),
            Self::NotOpen(state) => write!(f, "PR is {state}"),
            Self::HeadRepoDeleted => write!(f, "head repository was deleted"),
            Self::CompareFailed(e) => write!(f, "comparison failed: {e}"),
            Self::UpToDate => write!(f, "already up to date"),
            Self::ExcludedLabel(label) => write!(f, "has excluded label '{label}'"),
            Self::NotDraft => write!(f, "not a draft"),
            Self::IsDraft => write!(f, "is a draft"),
            Self::NoLabelsConfigured => write!(f, "no labels configured for labelled filter"),
            Self::MissingLabel => write!(f, "no matching label"),
            Self::BranchLookupFailed(e) => write!(f, "branch lookup failed: {e}"),
            Self::BaseNotProtected => write!(f, "base branch is not protected"),
            Self::AutoMergeDisabled => write!(f, "auto-merge is not enabled"),
        }
    }
}

/// Outcome of an eligibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Should be updated
    Eligible,
    /// Should be left alone
    Skip(SkipReason),
}

impl Eligibility {
    /// Whether the pull request should be updated
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl AutoUpdater<'_> {
    /// Whether `pull` should be updated, logging the reason when not
    pub async fn needs_update(&self, pull: &PullRequestSnapshot) -> bool {
        match self.eligibility(pull).await {
            Eligibility::Eligible => true,
            Eligibility::Skip(reason) => {
                info!(pr_number = pull.number, %reason, "skipping PR");
                false
            }
        }
    }

    /// Evaluate every filter against `pull`
    pub async fn eligibility(&self, pull: &PullRequestSnapshot) -> Eligibility {
        use Eligibility::Skip;

        if pull.is_merged() {
            return Skip(SkipReason::Merged);
        }
        if pull.state != PrState::Open {
            return Skip(SkipReason::NotOpen(pull.state));
        }
        let Some(ref head_repo) = pull.head.repo else {
            return Skip(SkipReason::HeadRepoDeleted);
        };

        // Head is the comparison base: behind_by counts base commits the head lacks
        let comparison = match self
            .platform
            .compare_refs(
                head_repo.owner_login(),
                &head_repo.name,
                pull.head.label_or_ref(),
                pull.base.label_or_ref(),
            )
            .await
        {
            Ok(c) => c,
            Err(e) => return Skip(SkipReason::CompareFailed(e.to_string())),
        };
        if comparison.behind_by == 0 {
            return Skip(SkipReason::UpToDate);
        }
        debug!(pr_number = pull.number, behind_by = comparison.behind_by, "PR is behind");

        if let Some(label) = pull
            .label_names()
            .find(|n| self.config.excluded_labels.iter().any(|e| e == n))
        {
            return Skip(SkipReason::ExcludedLabel(label.to_string()));
        }

        match self.config.ready_state {
            ReadyState::Draft if !pull.is_draft() => return Skip(SkipReason::NotDraft),
            ReadyState::ReadyForReview if pull.is_draft() => return Skip(SkipReason::IsDraft),
            _ => {}
        }

        match self.config.pr_filter {
            PrFilter::All => Eligibility::Eligible,
            PrFilter::Labelled => {
                if self.config.pr_labels.is_empty() {
                    Skip(SkipReason::NoLabelsConfigured)
                } else if pull.has_any_label(&self.config.pr_labels) {
                    Eligibility::Eligible
                } else {
                    Skip(SkipReason::MissingLabel)
                }
            }
            PrFilter::Protected => {
                match self
                    .platform
                    .branch_protected(
                        head_repo.owner_login(),
                        &head_repo.name,
                        &pull.base.ref_name,
                    )
                    .await
                {
                    Ok(true) => Eligibility::Eligible,
                    Ok(false) => Skip(SkipReason::BaseNotProtected),
                    Err(e) => Skip(SkipReason::BranchLookupFailed(e.to_string())),
                }
            }
            PrFilter::AutoMerge => {
                if pull.auto_merge.is_some() {
                    Eligibility::Eligible
                } else {
                    Skip(SkipReason::AutoMergeDisabled)
                }
            }
        }
    }
}
