//! Branch update engine
//!
//! Decides which open pull requests are behind their base branch and
//! merges the base into them:
//! 1. Eligibility - filter policies plus a fresh behind-by comparison
//! 2. Merge - remote merge call with conflict handling and bounded retry
//! 3. Sweep - per-PR orchestration, pagination and per-event fan-out
//!
//! Nothing is cached between calls; every decision re-fetches the facts it
//! needs from the platform.

mod eligibility;
mod merge;
mod sweep;

pub use eligibility::{Eligibility, SkipReason};
pub use sweep::RunSummary;

use crate::config::Config;
use crate::output::OutputSink;
use crate::platform::ForgeService;

/// Updates pull requests through a forge platform
///
/// Borrows its collaborators for the length of one invocation.
pub struct AutoUpdater<'a> {
    config: &'a Config,
    platform: &'a dyn ForgeService,
    outputs: &'a dyn OutputSink,
}

impl<'a> AutoUpdater<'a> {
    /// Create an updater over the given configuration and collaborators
    pub const fn new(
        config: &'a Config,
        platform: &'a dyn ForgeService,
        outputs: &'a dyn OutputSink,
    ) -> Self {
        Self {
            config,
            platform,
            outputs,
        }
    }
}
