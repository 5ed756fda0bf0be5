use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RepositoryRef;
use crate::error::{check_status, ApiError};

const SERVICE: &str = "GitHub";

/// Source-control operations the pipeline relies on
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Messages of the commits reachable from `head` but not from `base`, oldest first
    async fn compare_commits(
        &self,
        repo: &RepositoryRef,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ApiError>;

    /// Resolve a ref (branch, tag or SHA) to its commit SHA
    async fn commit_sha(&self, repo: &RepositoryRef, reference: &str) -> Result<String, ApiError>;

    /// Create an annotated tag object pointing at `sha`, returning the tag object's SHA
    async fn create_tag(
        &self,
        repo: &RepositoryRef,
        tag: &str,
        message: &str,
        sha: &str,
    ) -> Result<String, ApiError>;

    /// Create or force-move `refs/tags/<tag>` to `sha`
    async fn set_tag_ref(&self, repo: &RepositoryRef, tag: &str, sha: &str) -> Result<(), ApiError>;
}

// Response types for the REST API

#[derive(Serialize, Deserialize)]
struct Comparison {
    commits: Vec<CommitEntry>,
}

#[derive(Serialize, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Serialize, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Serialize, Deserialize)]
struct Commit {
    sha: String,
}

#[derive(Serialize, Deserialize)]
struct TagObject {
    sha: String,
}

#[derive(Serialize)]
struct CreateTagRequest<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefRequest<'a> {
    sha: &'a str,
    force: bool,
}

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("jira-deploy/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn repo_url(&self, repo: &RepositoryRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, repo.owner, repo.name, path
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn compare_commits(
        &self,
        repo: &RepositoryRef,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ApiError> {
        let url = self.repo_url(repo, &format!("compare/{}...{}", base, head));
        debug!(%url, "Comparing commits");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        let comparison: Comparison = check_status(SERVICE, response).await?.json().await?;

        Ok(comparison
            .commits
            .into_iter()
            .map(|entry| entry.commit.message)
            .collect())
    }

    async fn commit_sha(&self, repo: &RepositoryRef, reference: &str) -> Result<String, ApiError> {
        let url = self.repo_url(repo, &format!("commits/{}", reference));
        debug!(%url, "Resolving commit");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        let commit: Commit = check_status(SERVICE, response).await?.json().await?;

        Ok(commit.sha)
    }

    async fn create_tag(
        &self,
        repo: &RepositoryRef,
        tag: &str,
        message: &str,
        sha: &str,
    ) -> Result<String, ApiError> {
        let url = self.repo_url(repo, "git/tags");
        debug!(%url, tag, sha, "Creating tag object");

        let request = CreateTagRequest {
            tag,
            message,
            object: sha,
            kind: "commit",
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(&request)
            .send()
            .await?;
        let tag_object: TagObject = check_status(SERVICE, response).await?.json().await?;

        Ok(tag_object.sha)
    }

    async fn set_tag_ref(&self, repo: &RepositoryRef, tag: &str, sha: &str) -> Result<(), ApiError> {
        let url = self.repo_url(repo, &format!("git/refs/tags/{}", tag));
        debug!(%url, sha, "Moving tag ref");

        let response = self
            .client
            .patch(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(&UpdateRefRequest { sha, force: true })
            .send()
            .await?;

        // GitHub answers 422 "Reference does not exist" for a tag that was never pushed
        if !matches!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::NOT_FOUND
        ) {
            check_status(SERVICE, response).await?;
            return Ok(());
        }

        let url = self.repo_url(repo, "git/refs");
        debug!(%url, sha, "Creating tag ref");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(&CreateRefRequest {
                reference: format!("refs/tags/{}", tag),
                sha,
            })
            .send()
            .await?;
        check_status(SERVICE, response).await?;

        Ok(())
    }
}
