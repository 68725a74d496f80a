//! Catalog configuration (`apphub.toml`) and the CI environment.
//!
//! ```toml
//! [schema]
//! require_is_veworld_supported = true
//! enforce_domain_uniqueness = true
//! check_link_reachability = false
//!
//! [sync]
//! promoted = ["org.vechain.explorer"]
//!
//! [paths]
//! apps = "apps"
//! dist = "dist"
//! template = "public/package.json"
//! ```
//!
//! Every table and key is optional. Relative paths resolve against the
//! repository root.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use apphub_schema::SchemaOptions;

use crate::error::{Error, Result};
use crate::paths::Layout;
use crate::select::{MAX_PROMOTED, SYNC_APP_COUNT, SyncPolicy};

/// Default config file name, looked up in the repository root.
pub const CONFIG_FILE: &str = "apphub.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub schema: SchemaOptions,
    pub sync: SyncConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Bundle ids guaranteed a slot in `sync.json`.
    pub promoted: Vec<String>,
    pub count: usize,
    pub max_promoted: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            promoted: Vec::new(),
            count: SYNC_APP_COUNT,
            max_promoted: MAX_PROMOTED,
        }
    }
}

impl SyncConfig {
    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            count: self.count,
            max_promoted: self.max_promoted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub apps: Option<PathBuf>,
    pub dist: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

impl CatalogConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML, unknown keys, or a sync
    /// policy reserving more promoted slots than the list holds.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.sync.max_promoted > config.sync.count {
            return Err(Error::Config(format!(
                "sync.max_promoted ({}) exceeds sync.count ({})",
                config.sync.max_promoted, config.sync.count
            )));
        }
        Ok(config)
    }

    /// Load `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::parse(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// Resolve the on-disk layout under `root`.
    pub fn layout(&self, root: &Path) -> Layout {
        let mut layout = Layout::new(root);
        if let Some(apps) = &self.paths.apps {
            layout.apps = root.join(apps);
        }
        if let Some(dist) = &self.paths.dist {
            layout.dist = root.join(dist);
        }
        if let Some(template) = &self.paths.template {
            layout.template = root.join(template);
        }
        layout
    }
}

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The CI environment, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiContext {
    /// `CI=true`
    pub ci: bool,
    pub event_name: Option<String>,
    pub base_ref: Option<String>,
    pub token: Option<String>,
    pub event_path: Option<PathBuf>,
    pub repository: Option<String>,
    pub api_url: String,
}

impl CiContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            ci: get("CI").is_some_and(|v| v == "true"),
            event_name: get("GITHUB_EVENT_NAME"),
            base_ref: get("GITHUB_BASE_REF"),
            token: get("GITHUB_TOKEN"),
            event_path: get("GITHUB_EVENT_PATH").map(PathBuf::from),
            repository: get("GITHUB_REPOSITORY"),
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Running for a `pull_request` event.
    pub fn is_pull_request(&self) -> bool {
        self.event_name.as_deref() == Some("pull_request")
    }
}
