//! pr-autoupdate: keep pull requests up to date with their base branch
//!
//! Given a repository event, finds open pull requests that are behind their
//! base branch and merges the base into them through the forge's merge
//! endpoint, subject to label, draft, protection and auto-merge filters.

pub mod config;
pub mod error;
pub mod event;
pub mod output;
pub mod platform;
pub mod types;
pub mod update;

pub use config::{Args, Config};
pub use error::{Error, Result};
pub use event::Event;
pub use update::AutoUpdater;
