//! Submission validation.
//!
//! [`validate_app`] runs the per-app rules, first failure wins:
//!
//! 1. the directory name is a bundle id
//! 2. the directory holds only files
//! 3. exactly `manifest.json` and `logo.png` (plus `.DS_Store` outside CI)
//! 4. the logo is a 512x512 PNG
//! 5. manifest fields, via [`AppManifest::from_value`]
//!
//! [`Validator`] drives it over the whole catalog or over a single pull
//! request, then runs the cross-app passes (domain uniqueness, links).

/// Duplicate name per domain detection.
pub mod domains;
/// `href` reachability checks.
pub mod links;
/// Pull request scope inference.
pub mod scope;

pub use domains::{DomainIndex, check_unique_domains, normalize_domain};
pub use links::{HttpLinkProber, LinkProber, check_links};
pub use scope::submitted_app;

use apphub_schema::{
    AppManifest, BundleId, DS_STORE, GITKEEP, LOGO_FILE, LOGO_SIZE, REQUIRED_FILES,
    SchemaOptions,
};
use serde_json::Value;

use crate::Reporter;
use crate::error::{LogoProblem, Result, ValidationError};
use crate::image::{ImageFormat, ImageProber};
use crate::source::{AppSource, read_manifest_object};

/// Rule switches for one validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorOptions {
    pub schema: SchemaOptions,
    /// Running under CI (`CI=true`): `.DS_Store` is no longer tolerated.
    pub ci: bool,
}

/// Validate one app directory.
///
/// # Errors
///
/// Returns the first rule the app breaks as a validation error, or an I/O
/// error if the directory cannot be read.
pub async fn validate_app(
    app_id: &str,
    source: &dyn AppSource,
    prober: &dyn ImageProber,
    opts: &ValidatorOptions,
) -> Result<AppManifest> {
    BundleId::new(app_id).map_err(ValidationError::from)?;

    let mut present: Vec<&str> = Vec::new();
    let entries = source.list_app(app_id).await?;
    for entry in &entries {
        if !entry.is_file() {
            return Err(ValidationError::DisallowedEntry(entry.name.clone()).into());
        }
        if entry.name == DS_STORE {
            if opts.ci {
                return Err(ValidationError::DisallowedFile(DS_STORE.to_string()).into());
            }
            continue;
        }
        if !REQUIRED_FILES.contains(&entry.name.as_str()) {
            return Err(ValidationError::DisallowedFile(entry.name.clone()).into());
        }
        present.push(entry.name.as_str());
    }
    for name in REQUIRED_FILES {
        if !present.contains(&name) {
            return Err(ValidationError::MissingFile(name.to_string()).into());
        }
    }

    let logo = source.read_file(app_id, LOGO_FILE).await?;
    check_logo(prober, &logo)?;

    let obj = read_manifest_object(source, app_id).await?;
    let manifest = AppManifest::from_value(&obj, opts.schema)
        .map_err(|errs| ValidationError::from(errs.first().clone()))?;

    tracing::debug!(app = app_id, "app passed structural checks");
    Ok(manifest)
}

fn check_logo(prober: &dyn ImageProber, bytes: &[u8]) -> Result<(), ValidationError> {
    let info = match prober.probe(bytes) {
        Some(info) if info.format == ImageFormat::Png => info,
        _ => return Err(ValidationError::InvalidLogo(LogoProblem::NotPng)),
    };
    if info.width != LOGO_SIZE || info.height != LOGO_SIZE {
        return Err(ValidationError::InvalidLogo(LogoProblem::WrongSize {
            width: info.width,
            height: info.height,
        }));
    }
    Ok(())
}

/// Apps that passed a validation run, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub apps: Vec<(BundleId, AppManifest)>,
}

impl ValidationReport {
    pub fn count(&self) -> usize {
        self.apps.len()
    }
}

/// Drives [`validate_app`] and the cross-app passes over a catalog.
pub struct Validator<'a> {
    source: &'a dyn AppSource,
    prober: &'a dyn ImageProber,
    links: Option<&'a dyn LinkProber>,
    opts: ValidatorOptions,
}

impl std::fmt::Debug for Validator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("opts", &self.opts)
            .field("links", &self.links.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> Validator<'a> {
    pub fn new(
        source: &'a dyn AppSource,
        prober: &'a dyn ImageProber,
        opts: ValidatorOptions,
    ) -> Self {
        Self {
            source,
            prober,
            links: None,
            opts,
        }
    }

    /// Prober used when `check_link_reachability` is enabled.
    pub fn with_links(mut self, links: &'a dyn LinkProber) -> Self {
        self.links = Some(links);
        self
    }

    /// App directories in the catalog, in enumeration order.
    ///
    /// `.gitkeep` is skipped, and `.DS_Store` too outside CI. Any other
    /// loose file in the apps root is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StrayFile`] for a loose file, or an I/O error.
    pub async fn app_dirs(&self) -> Result<Vec<String>> {
        list_app_dirs(self.source, self.opts.ci).await
    }

    /// Validate every app, then run the cross-app passes.
    ///
    /// Per-app failures are wrapped as `check <id> -> <message>`.
    ///
    /// # Errors
    ///
    /// Returns the first failure found.
    pub async fn validate_all(&self, reporter: &dyn Reporter) -> Result<ValidationReport> {
        reporter.section("validating apps");
        let mut report = ValidationReport::default();
        let mut domains = DomainIndex::default();

        for name in self.app_dirs().await? {
            let manifest = validate_app(&name, self.source, self.prober, &self.opts)
                .await
                .map_err(|e| e.in_app(&name))?;
            let id = BundleId::new(&name).map_err(ValidationError::from)?;
            domains.insert(id.as_str(), &manifest.name, &manifest.href);
            reporter.checked(id.as_str());
            report.apps.push((id, manifest));
        }

        if self.opts.schema.enforce_domain_uniqueness {
            domains.check()?;
        }

        if self.opts.schema.check_link_reachability {
            self.check_report_links(&report, true, reporter).await?;
        }

        tracing::info!(apps = report.count(), "catalog validated");
        reporter.summary(report.count(), "validated");
        Ok(report)
    }

    /// Validate the single app a pull request touches.
    ///
    /// `changed` is the list of paths changed against the base branch.
    /// Errors are not wrapped with the app id: the submitter knows which app
    /// they sent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ScopeViolation`] when the change is not
    /// confined to one app directory, otherwise the first failing rule.
    pub async fn validate_submission(
        &self,
        changed: &[String],
        reporter: &dyn Reporter,
    ) -> Result<ValidationReport> {
        let app_id = submitted_app(changed)?;
        reporter.section(&format!("validating submission {app_id}"));

        let manifest = validate_app(&app_id, self.source, self.prober, &self.opts).await?;
        let id = BundleId::new(&app_id).map_err(ValidationError::from)?;

        if self.opts.schema.enforce_domain_uniqueness {
            let mut domains = self.catalog_domains(id.as_str(), reporter).await?;
            domains.insert(id.as_str(), &manifest.name, &manifest.href);
            domains.check()?;
        }

        reporter.checked(id.as_str());
        let report = ValidationReport {
            apps: vec![(id, manifest)],
        };

        if self.opts.schema.check_link_reachability {
            self.check_report_links(&report, false, reporter).await?;
        }
        reporter.summary(report.count(), "validated");
        Ok(report)
    }

    /// Reachability-only pass over every app, or only the one a pull request
    /// touches when `changed` is given.
    ///
    /// Manifests are read leniently: only `href` has to be usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnreachableHref`] for the first dead link.
    pub async fn validate_links(
        &self,
        changed: Option<&[String]>,
        reporter: &dyn Reporter,
    ) -> Result<usize> {
        let Some(links) = self.links else {
            return Err(crate::Error::Config("link checking requires a link prober".into()));
        };
        reporter.section("checking links");

        let ids = match changed {
            Some(files) => vec![submitted_app(files)?],
            None => self.app_dirs().await?,
        };

        let wrap = changed.is_none();
        let mut targets = Vec::with_capacity(ids.len());
        for id in &ids {
            let href = match read_href(self.source, id).await {
                Ok(href) => href,
                Err(e) if wrap => return Err(e.in_app(id)),
                Err(e) => return Err(e),
            };
            targets.push((id.clone(), href));
        }

        check_links(&targets, links, wrap, reporter).await?;
        reporter.summary(targets.len(), "reachable");
        Ok(targets.len())
    }

    async fn check_report_links(
        &self,
        report: &ValidationReport,
        wrap: bool,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let Some(links) = self.links else {
            return Err(crate::Error::Config(
                "check_link_reachability is enabled but no link prober was configured".into(),
            ));
        };
        let targets: Vec<(String, String)> = report
            .apps
            .iter()
            .map(|(id, m)| (id.to_string(), m.href.clone()))
            .collect();
        check_links(&targets, links, wrap, reporter).await
    }

    // Name/href of every other app, read leniently: they were validated when merged.
    async fn catalog_domains(&self, skip: &str, reporter: &dyn Reporter) -> Result<DomainIndex> {
        let mut domains = DomainIndex::default();
        for name in self.app_dirs().await? {
            if name == skip {
                continue;
            }
            match read_manifest_object(self.source, &name).await {
                Ok(obj) => {
                    if let (Some(app_name), Some(href)) = (
                        obj.get("name").and_then(Value::as_str),
                        obj.get("href").and_then(Value::as_str),
                    ) {
                        domains.insert(&name, app_name, href);
                    }
                }
                Err(e) => {
                    tracing::warn!(app = %name, "skipping unreadable manifest: {e}");
                    reporter.warning(&format!("skipped {name}: {e}"));
                }
            }
        }
        Ok(domains)
    }
}

/// App directory names under the apps root, in enumeration order.
///
/// # Errors
///
/// Returns [`ValidationError::StrayFile`] for a loose file other than
/// `.gitkeep` (or `.DS_Store` outside CI), or an I/O error.
pub async fn list_app_dirs(source: &dyn AppSource, ci: bool) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for entry in source.list_root().await? {
        if entry.is_dir() {
            out.push(entry.name);
            continue;
        }
        if entry.name == GITKEEP || (entry.name == DS_STORE && !ci) {
            continue;
        }
        return Err(ValidationError::StrayFile(entry.name).into());
    }
    Ok(out)
}

async fn read_href(source: &dyn AppSource, id: &str) -> Result<String> {
    let obj = read_manifest_object(source, id).await?;
    match obj.get("href").and_then(Value::as_str) {
        Some(href) if apphub_schema::pattern::is_http_url(href) => Ok(href.to_string()),
        _ => Err(ValidationError::InvalidField {
            field: "href",
            reason: "href should be a url and start with http or https".into(),
        }
        .into()),
    }
}
