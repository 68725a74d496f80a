pub mod pack;
pub mod validate;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use apphub_core::config::{CONFIG_FILE, CatalogConfig, CiContext};
use apphub_core::paths::Layout;

/// Everything a command needs to know about the repository it runs in.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: CatalogConfig,
    pub layout: Layout,
    pub ci: CiContext,
}

impl Workspace {
    /// Load the config under `root` (or `config` if given) and read the CI
    /// environment.
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve repository root {}", root.display()))?;
        let config_path = config.map_or_else(|| root.join(CONFIG_FILE), Path::to_path_buf);
        let config = CatalogConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        let layout = config.layout(&root);
        Ok(Self {
            root,
            config,
            layout,
            ci: CiContext::from_env(),
        })
    }
}
