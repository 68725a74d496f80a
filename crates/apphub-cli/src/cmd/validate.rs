//! Validate command
use anyhow::Result;
use std::path::Path;

use apphub_core::git::{ChangeSource, Git, GitDiff};
use apphub_core::github::{CommentPoster, GitHubComments, report_failure};
use apphub_core::image::PngProber;
use apphub_core::source::FsAppSource;
use apphub_core::validate::{HttpLinkProber, Validator, ValidatorOptions};
use apphub_core::{Error, Reporter};

use super::Workspace;
use crate::ValidateCommands;
use crate::ui::{ConsoleReporter, print_failure, print_success};

/// Validate the catalog, or on a `pull_request` event only the submitted app.
///
/// Prints the status line either way. A failed pull request validation is
/// also reported back as a comment.
pub async fn validate(
    root: &Path,
    config: Option<&Path>,
    command: Option<&ValidateCommands>,
) -> Result<()> {
    let ws = match Workspace::load(root, config) {
        Ok(ws) => ws,
        Err(e) => {
            print_failure("Validation failed", &format!("{e:#}"));
            return Err(e);
        }
    };
    let links_only = matches!(command, Some(ValidateCommands::Link));
    let reporter = ConsoleReporter::new();

    match run(&ws, links_only, &reporter).await {
        Ok(count) => {
            if ws.ci.is_pull_request() {
                print_success("Validation passed, Congrats!");
            } else {
                print_success(&format!("Validation passed, processed {count} apps. Congrats!"));
            }
            Ok(())
        }
        Err(err) => {
            print_failure("Validation failed", &err.to_string());
            if ws.ci.is_pull_request() && err.is_validation() {
                comment(&ws, &err).await;
            }
            Err(err.into())
        }
    }
}

async fn run(
    ws: &Workspace,
    links_only: bool,
    reporter: &dyn Reporter,
) -> apphub_core::Result<usize> {
    let source = FsAppSource::new(&ws.layout.apps);
    let opts = ValidatorOptions {
        schema: ws.config.schema,
        ci: ws.ci.ci,
    };

    let links = if links_only || opts.schema.check_link_reachability {
        Some(HttpLinkProber::new()?)
    } else {
        None
    };
    let mut validator = Validator::new(&source, &PngProber, opts);
    if let Some(links) = &links {
        validator = validator.with_links(links);
    }

    let changed = if ws.ci.is_pull_request() {
        Some(changed_files(ws).await?)
    } else {
        None
    };
    tracing::debug!(links_only, pull_request = changed.is_some(), "validating");

    match (links_only, changed) {
        (true, changed) => validator.validate_links(changed.as_deref(), reporter).await,
        (false, Some(changed)) => validator
            .validate_submission(&changed, reporter)
            .await
            .map(|report| report.count()),
        (false, None) => validator
            .validate_all(reporter)
            .await
            .map(|report| report.count()),
    }
}

async fn changed_files(ws: &Workspace) -> apphub_core::Result<Vec<String>> {
    let base = ws
        .ci
        .base_ref
        .as_deref()
        .ok_or_else(|| Error::Config("GITHUB_BASE_REF is not set".into()))?;
    GitDiff::new(Git::locate(&ws.root)?, base)
        .changed_files()
        .await
}

async fn comment(ws: &Workspace, err: &Error) {
    let poster = match GitHubComments::from_ci(&ws.ci) {
        Ok(poster) => Some(poster),
        Err(e) => {
            tracing::warn!("cannot comment on the pull request: {e}");
            None
        }
    };
    report_failure(poster.as_ref().map(|p| p as &dyn CommentPoster), err).await;
}
