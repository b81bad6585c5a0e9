//! Configuration surface
//!
//! Every knob is a long flag backed by the environment variable GitHub
//! Actions (or the workflow's `env:` block) provides. [`Args`] is the raw
//! parsed form; [`Config`] is the resolved, read-only snapshot the updater
//! works from.

use crate::types::RepoRef;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of retries for transient merge failures
pub const DEFAULT_RETRY_COUNT: u32 = 5;

/// Default backoff between merge retries, in milliseconds
pub const DEFAULT_RETRY_SLEEP_MS: u64 = 300;

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Which pull requests are considered at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PrFilter {
    /// Every open pull request
    #[default]
    All,
    /// Only pull requests carrying one of the configured labels
    Labelled,
    /// Only pull requests whose base branch is protected
    Protected,
    /// Only pull requests with auto-merge enabled
    #[value(name = "auto_merge")]
    AutoMerge,
}

/// Filter on draft status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReadyState {
    /// Drafts and ready pull requests
    #[default]
    All,
    /// Drafts only
    Draft,
    /// Ready-for-review only
    #[value(name = "ready_for_review")]
    ReadyForReview,
}

/// What to do when a merge conflicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConflictAction {
    /// Report the conflict as a failure
    #[default]
    Fail,
    /// Skip the pull request
    Ignore,
}

/// Command-line arguments, each also read from the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "autoupdate")]
#[command(about = "Keep pull requests up to date with their base branch")]
#[command(version)]
pub struct Args {
    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: String,

    /// Path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Ref that triggered the run (e.g. `refs/heads/main`)
    #[arg(long, env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Repository in `owner/repo` form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// File receiving action outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Report what would be updated without merging
    #[arg(
        long,
        env = "DRY_RUN",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub dry_run: bool,

    /// Which pull requests to consider [all, labelled, protected, auto_merge]
    #[arg(
        long,
        env = "PR_FILTER",
        default_value = "all",
        value_parser = enum_or_default::<PrFilter>
    )]
    pub pr_filter: PrFilter,

    /// Comma-separated labels required by the `labelled` filter
    #[arg(long, env = "PR_LABELS", default_value = "")]
    pub pr_labels: String,

    /// Comma-separated labels that always exclude a pull request
    #[arg(long, env = "EXCLUDED_LABELS", default_value = "")]
    pub excluded_labels: String,

    /// Draft status filter [all, draft, ready_for_review]
    #[arg(
        long,
        env = "PR_READY_STATE",
        default_value = "all",
        value_parser = enum_or_default::<ReadyState>
    )]
    pub pr_ready_state: ReadyState,

    /// Custom merge commit message
    #[arg(long, env = "MERGE_MSG")]
    pub merge_msg: Option<String>,

    /// Comment posted on a pull request when its update conflicts
    #[arg(long, env = "CONFLICT_MSG")]
    pub conflict_msg: Option<String>,

    /// Retries for transient merge failures
    #[arg(
        long,
        env = "RETRY_COUNT",
        default_value_t = DEFAULT_RETRY_COUNT,
        value_parser = parse_retry_count
    )]
    pub retry_count: u32,

    /// Milliseconds to sleep between retries
    #[arg(
        long,
        env = "RETRY_SLEEP",
        default_value_t = DEFAULT_RETRY_SLEEP_MS,
        value_parser = parse_retry_sleep
    )]
    pub retry_sleep: u64,

    /// Action when a merge conflicts [fail, ignore]
    #[arg(
        long,
        env = "MERGE_CONFLICT_ACTION",
        default_value = "fail",
        value_parser = enum_or_default::<ConflictAction>
    )]
    pub merge_conflict_action: ConflictAction,

    /// Comma-separated branches swept on `schedule` events
    #[arg(long, env = "SCHEDULE_BRANCHES", default_value = "")]
    pub schedule_branches: String,
}

/// Resolved, immutable configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Report intent without merging
    pub dry_run: bool,
    /// Primary filter mode
    pub pr_filter: PrFilter,
    /// Labels required by [`PrFilter::Labelled`]
    pub pr_labels: Vec<String>,
    /// Labels excluding a pull request regardless of filter
    pub excluded_labels: Vec<String>,
    /// Draft status filter
    pub ready_state: ReadyState,
    /// Custom merge commit message
    pub merge_msg: Option<String>,
    /// Comment posted on conflicts
    pub conflict_msg: Option<String>,
    /// Retries after the first merge attempt
    pub retry_count: u32,
    /// Backoff between merge attempts
    pub retry_sleep: Duration,
    /// What to do on conflicts
    pub conflict_action: ConflictAction,
    /// Ref that triggered the run
    pub git_ref: Option<String>,
    /// Repository in `owner/repo` form, unparsed
    pub repository: Option<String>,
    /// Branches swept on schedule events
    pub schedule_branches: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            pr_filter: PrFilter::All,
            pr_labels: Vec::new(),
            excluded_labels: Vec::new(),
            ready_state: ReadyState::All,
            merge_msg: None,
            conflict_msg: None,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_sleep: Duration::from_millis(DEFAULT_RETRY_SLEEP_MS),
            conflict_action: ConflictAction::Fail,
            git_ref: None,
            repository: None,
            schedule_branches: Vec::new(),
        }
    }
}

impl Config {
    /// Parsed `owner/repo`, if well-formed
    pub fn repository(&self) -> Option<RepoRef> {
        self.repository.as_deref().and_then(RepoRef::parse)
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            dry_run: args.dry_run,
            pr_filter: args.pr_filter,
            pr_labels: parse_list(&args.pr_labels),
            excluded_labels: parse_list(&args.excluded_labels),
            ready_state: args.pr_ready_state,
            merge_msg: non_blank(args.merge_msg.as_deref()),
            conflict_msg: non_blank(args.conflict_msg.as_deref()),
            retry_count: args.retry_count,
            retry_sleep: Duration::from_millis(args.retry_sleep),
            conflict_action: args.merge_conflict_action,
            git_ref: non_blank(args.git_ref.as_deref()),
            repository: non_blank(args.repository.as_deref()),
            schedule_branches: parse_list(&args.schedule_branches),
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Blank values take the default; workflow inputs left unset arrive as `""`
fn enum_or_default<T: ValueEnum + Default>(raw: &str) -> Result<T, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    T::from_str(raw, true)
}

fn number_or<T: std::str::FromStr>(raw: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse().map_err(|e| format!("invalid number '{raw}': {e}"))
}

fn parse_retry_count(raw: &str) -> Result<u32, String> {
    number_or(raw, DEFAULT_RETRY_COUNT)
}

fn parse_retry_sleep(raw: &str) -> Result<u64, String> {
    number_or(raw, DEFAULT_RETRY_SLEEP_MS)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
