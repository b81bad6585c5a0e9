//! autoupdate - keep pull requests up to date with their base branch

use anyhow::Context;
use clap::Parser;
use pr_autoupdate::output::{ActionsOutput, OutputSink};
use pr_autoupdate::platform::GitHubService;
use pr_autoupdate::update::RunSummary;
use pr_autoupdate::{Args, AutoUpdater, Config, Event};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let outputs = ActionsOutput::new(args.output_file.clone());

    if let Err(e) = run(&args, &outputs).await {
        outputs.set_failed(&format!("{e:#}"));
    }

    if outputs.has_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(args: &Args, outputs: &ActionsOutput) -> anyhow::Result<()> {
    let config = Config::from(args);
    let event = Event::from_file(&args.event_name, &args.event_path)
        .with_context(|| format!("failed to read {} event", args.event_name))?;
    let platform = GitHubService::new(&args.github_token, &args.api_url)?;

    let updater = AutoUpdater::new(&config, &platform, outputs);
    match updater.run(&event).await? {
        RunSummary::Swept(count) => info!(count, "updated pull requests"),
        RunSummary::PullRequest(updated) => info!(updated, "handled pull request"),
    }
    Ok(())
}
