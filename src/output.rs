//! Action outputs and the failure channel

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

/// Output name signalling whether the last merge attempt conflicted
pub const CONFLICTED: &str = "conflicted";

/// Sink for named outputs and user-visible failures
pub trait OutputSink: Send + Sync {
    /// Set a named output value
    fn set_output(&self, name: &str, value: &str);

    /// Report a failure; the process should exit unsuccessfully
    fn set_failed(&self, message: &str);
}

/// GitHub Actions output sink
///
/// Appends `name=value` lines to the `GITHUB_OUTPUT` file and emits
/// `::error::` workflow commands for failures.
#[derive(Debug, Default)]
pub struct ActionsOutput {
    path: Option<PathBuf>,
    failed: AtomicBool,
}

impl ActionsOutput {
    /// Create a sink writing to `path`, or only logging when `None`
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            failed: AtomicBool::new(false),
        }
    }

    /// Whether any failure was reported
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn append(&self, name: &str, value: &str) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{name}={value}")?;
        Ok(())
    }
}

impl OutputSink for ActionsOutput {
    fn set_output(&self, name: &str, value: &str) {
        if let Err(e) = self.append(name, value) {
            warn!(name, error = %e, "failed to write action output");
        }
    }

    fn set_failed(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        error!("{message}");
        println!("::error::{}", escape_data(message));
    }
}

/// Escape a workflow command message
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
