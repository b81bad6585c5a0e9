//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::ForgeService;
use crate::types::{Comparison, MergeOutcome, MergeRequest, PullPage, PullRequestSnapshot};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size used when listing pull requests (GitHub's maximum)
const PER_PAGE: u8 = 100;

#[derive(Deserialize)]
struct BranchInfo {
    protected: bool,
}

#[derive(Deserialize)]
struct MergeCommit {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Serialize)]
struct MergePayload<'a> {
    base: &'a str,
    head: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_message: Option<&'a str>,
}

#[derive(Serialize)]
struct ListPullsParams<'a> {
    state: &'a str,
    base: &'a str,
    sort: &'a str,
    direction: &'a str,
    per_page: u8,
    page: u32,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (merge endpoint)
    token: String,
    /// HTTP client for raw requests (merge endpoint)
    http_client: Client,
    /// API base URL, without trailing slash
    api_url: String,
}

impl GitHubService {
    /// Create a new GitHub service against `api_url` (e.g. `https://api.github.com`)
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        let api_url = api_url.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-autoupdate")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_url,
        })
    }
}

#[async_trait]
impl ForgeService for GitHubService {
    async fn compare_refs(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison> {
        debug!(owner, repo, base, head, "comparing refs");
        let route = format!(
            "/repos/{owner}/{repo}/compare/{}...{}",
            urlencoding::encode(base),
            urlencoding::encode(head)
        );
        let comparison: Comparison = self.client.get(route, None::<&()>).await?;
        debug!(behind_by = comparison.behind_by, "compared refs");
        Ok(comparison)
    }

    async fn branch_protected(&self, owner: &str, repo: &str, branch: &str) -> Result<bool> {
        debug!(owner, repo, branch, "fetching branch");
        let route = format!(
            "/repos/{owner}/{repo}/branches/{}",
            urlencoding::encode(branch)
        );
        let info: BranchInfo = self.client.get(route, None::<&()>).await?;
        debug!(branch, protected = info.protected, "fetched branch");
        Ok(info.protected)
    }

    async fn merge_branch(&self, request: &MergeRequest) -> Result<MergeOutcome> {
        debug!(
            owner = %request.owner,
            repo = %request.repo,
            base = %request.base,
            head = %request.head,
            "merging branch"
        );
        let url = format!(
            "{}/repos/{}/{}/merges",
            self.api_url, request.owner, request.repo
        );
        let payload = MergePayload {
            base: &request.base,
            head: &request.head,
            commit_message: request.commit_message.as_deref(),
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::CREATED => {
                let commit: MergeCommit = response.json().await?;
                debug!(sha = ?commit.sha, "merged branch");
                Ok(MergeOutcome::Merged { sha: commit.sha })
            }
            StatusCode::NO_CONTENT => {
                debug!("branch already up to date");
                Ok(MergeOutcome::AlreadyUpToDate)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiMessage>(&body)
                    .map(|m| m.message)
                    .unwrap_or(body);
                debug!(status = status.as_u16(), %message, "merge failed");
                Err(Error::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn list_open_pulls(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        page: u32,
    ) -> Result<PullPage> {
        debug!(owner, repo, base, page, "listing open PRs");
        let route = format!("/repos/{owner}/{repo}/pulls");
        let params = ListPullsParams {
            state: "open",
            base,
            sort: "updated",
            direction: "asc",
            per_page: PER_PAGE,
            page,
        };
        let items: Vec<PullRequestSnapshot> = self.client.get(route, Some(&params)).await?;
        let has_next = items.len() == usize::from(PER_PAGE);
        debug!(page, count = items.len(), has_next, "listed open PRs");
        Ok(PullPage { items, has_next })
    }

    async fn create_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(owner, repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }
}
