//! Version control lookups: when an app was first added, and what a pull
//! request changed.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Resolves when an app directory first appeared.
#[async_trait]
pub trait CreationTimeSource: Send + Sync {
    /// Creation time of `app_id` in epoch milliseconds.
    async fn created_at(&self, app_id: &str) -> Result<i64>;
}

/// Lists the files a pull request changed, relative to the repository root.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    async fn changed_files(&self) -> Result<Vec<String>>;
}

/// A located `git` executable bound to a working tree.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
    work_tree: PathBuf,
}

impl Git {
    /// Find `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if `git` is not installed.
    pub fn locate(work_tree: impl Into<PathBuf>) -> Result<Self> {
        let program = which::which("git").map_err(|e| Error::Tool {
            tool: "git",
            message: format!("not found on PATH: {e}"),
        })?;
        Ok(Self {
            program,
            work_tree: work_tree.into(),
        })
    }

    /// Run git and return its stdout.
    ///
    /// A non-zero exit is an error. Output on stderr alone is only logged,
    /// git prints progress and hints there.
    async fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "running git");
        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_tree)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to spawn git: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Git(format!(
                "git {} exited with {}: {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            tracing::warn!(stderr = %stderr.trim(), "git wrote to stderr");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// [`CreationTimeSource`] reading the commit that added each app directory.
#[derive(Debug, Clone)]
pub struct GitHistory {
    git: Git,
    apps_dir: PathBuf,
}

impl GitHistory {
    pub fn new(git: Git, apps_dir: impl Into<PathBuf>) -> Self {
        Self {
            git,
            apps_dir: apps_dir.into(),
        }
    }
}

#[async_trait]
impl CreationTimeSource for GitHistory {
    async fn created_at(&self, app_id: &str) -> Result<i64> {
        let path = self.apps_dir.join(app_id);
        let path = path.to_string_lossy();
        let stdout = self
            .git
            .run(&["log", "--diff-filter=A", "--follow", "--format=%aI", "--", &path])
            .await?;
        parse_first_added(&stdout).ok_or_else(|| {
            Error::Git(format!("can not find create time from git for dir: {app_id}"))
        })
    }
}

/// Earliest author date in `git log --format=%aI` output, in epoch ms.
///
/// Log output is newest first, so the earliest add is the last non-empty
/// line.
pub fn parse_first_added(stdout: &str) -> Option<i64> {
    let line = stdout.lines().map(str::trim).rfind(|l| !l.is_empty())?;
    chrono::DateTime::parse_from_rfc3339(line)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// [`ChangeSource`] diffing the work tree against `origin/<base>`.
#[derive(Debug, Clone)]
pub struct GitDiff {
    git: Git,
    base_ref: String,
}

impl GitDiff {
    pub fn new(git: Git, base_ref: impl Into<String>) -> Self {
        Self {
            git,
            base_ref: base_ref.into(),
        }
    }
}

#[async_trait]
impl ChangeSource for GitDiff {
    async fn changed_files(&self) -> Result<Vec<String>> {
        let base = format!("origin/{}", self.base_ref);
        let stdout = self.git.run(&["diff", "--name-only", &base]).await?;
        let files = parse_name_list(&stdout);
        if files.is_empty() {
            return Err(Error::Git("changes not found".into()));
        }
        Ok(files)
    }
}

/// Non-empty lines of `git diff --name-only`.
pub fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
