//! Pull request feedback on GitHub.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::config::CiContext;
use crate::error::{Error, Result};

/// Owner and name of the repository a workflow runs in, parsed from
/// `GITHUB_REPOSITORY`.
///
/// ```
/// use apphub_core::github::GitHubRepo;
///
/// let repo = GitHubRepo::new("vechain/app-hub").unwrap();
/// assert_eq!((repo.owner.as_str(), repo.name.as_str()), ("vechain", "app-hub"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub owner: String,
    pub name: String,
}

impl GitHubRepo {
    /// # Errors
    ///
    /// Returns [`Error::Config`] unless `slug` is exactly two non-empty
    /// segments joined by `/`.
    pub fn new(slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "GITHUB_REPOSITORY should look like owner/name, got {slug:?}"
            ))),
        }
    }
}

/// The pull request a workflow run belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub repo: GitHubRepo,
    pub number: u64,
}

impl PullRequest {
    /// Resolve from `GITHUB_REPOSITORY` and the event payload at
    /// `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either is missing or the payload carries no
    /// pull request number.
    pub fn from_ci(ctx: &CiContext) -> Result<Self> {
        let repo = ctx
            .repository
            .as_deref()
            .ok_or_else(|| Error::Config("GITHUB_REPOSITORY is not set".into()))?;
        let path = ctx
            .event_path
            .as_deref()
            .ok_or_else(|| Error::Config("GITHUB_EVENT_PATH is not set".into()))?;
        Ok(Self {
            repo: GitHubRepo::new(repo)?,
            number: read_event_number(path)?,
        })
    }
}

fn read_event_number(path: &Path) -> Result<u64> {
    let content = std::fs::read(path).map_err(|e| {
        Error::context("failed to read event payload", format!("{}: {e}", path.display()))
    })?;
    let event: Value = serde_json::from_slice(&content)?;
    pull_request_number(&event)
        .ok_or_else(|| Error::Config("event payload has no pull request number".into()))
}

/// `pull_request.number`, falling back to the top-level `number`.
pub fn pull_request_number(event: &Value) -> Option<u64> {
    event
        .pointer("/pull_request/number")
        .and_then(Value::as_u64)
        .or_else(|| event.get("number").and_then(Value::as_u64))
}

/// Comment text for a failed submission: a warning marker and the message
/// with its first letter capitalized.
pub fn comment_body(message: &str) -> String {
    let mut chars = message.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!(":warning: {capitalized}")
}

/// Posts a comment on the pull request under validation.
#[async_trait]
pub trait CommentPoster: Send + Sync {
    async fn post_comment(&self, body: &str) -> Result<()>;
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// [`CommentPoster`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubComments {
    client: reqwest::Client,
    api_url: String,
    token: String,
    pr: PullRequest,
}

impl GitHubComments {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str, token: impl Into<String>, pr: PullRequest) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            pr,
        })
    }

    /// Build from the CI environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `GITHUB_TOKEN` or the pull request cannot
    /// be resolved.
    pub fn from_ci(ctx: &CiContext) -> Result<Self> {
        let token = ctx
            .token
            .clone()
            .ok_or_else(|| Error::Config("GITHUB_TOKEN is not set".into()))?;
        Self::new(&ctx.api_url, token, PullRequest::from_ci(ctx)?)
    }

    fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url,
            self.pr.repo.owner,
            self.pr.repo.name,
            self.pr.number
        )
    }
}

#[async_trait]
impl CommentPoster for GitHubComments {
    async fn post_comment(&self, body: &str) -> Result<()> {
        let url = self.comments_url();
        tracing::debug!(%url, "posting pull request comment");
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&CommentRequest { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Tell the submitter why their pull request failed.
///
/// Only validation errors are reported; infrastructure failures are for the
/// maintainers and stay in the workflow log. Posting is best-effort: a
/// failure is logged and never replaces `err`. Returns whether a comment
/// was posted.
pub async fn report_failure(poster: Option<&dyn CommentPoster>, err: &Error) -> bool {
    if !err.is_validation() {
        return false;
    }
    let Some(poster) = poster else {
        tracing::warn!("no GitHub credentials, not commenting on the pull request");
        return false;
    };
    match poster.post_comment(&comment_body(&err.to_string())).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("failed to comment on the pull request: {e}");
            false
        }
    }
}
