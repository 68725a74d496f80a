use std::path::{Path, PathBuf};

use apphub_schema::LOGO_FILE;

/// Directory names relative to the repository root.
pub const APPS_DIR: &str = "apps";
pub const DIST_DIR: &str = "dist";
pub const TEMPLATE_FILE: &str = "public/package.json";
pub const IMGS_DIR: &str = "imgs";
pub const INDEX_FILE: &str = "index.json";
pub const SYNC_FILE: &str = "sync.json";
pub const PACKAGE_FILE: &str = "package.json";

/// Where the catalog and its outputs live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub apps: PathBuf,
    pub dist: PathBuf,
    pub template: PathBuf,
}

impl Layout {
    /// Default layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            apps: root.join(APPS_DIR),
            dist: root.join(DIST_DIR),
            template: root.join(TEMPLATE_FILE),
            root,
        }
    }

    /// App directory: apps/<id>
    pub fn app_dir(&self, id: &str) -> PathBuf {
        self.apps.join(id)
    }

    /// Source logo: apps/<id>/logo.png
    pub fn logo_path(&self, id: &str) -> PathBuf {
        self.app_dir(id).join(LOGO_FILE)
    }
}

/// Packed logo inside an output directory: <out>/imgs/<id>.png
pub fn packed_logo_path(out: &Path, id: &str) -> PathBuf {
    out.join(IMGS_DIR).join(format!("{id}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = Layout::new("/repo");
        assert_eq!(layout.apps, PathBuf::from("/repo/apps"));
        assert_eq!(layout.dist, PathBuf::from("/repo/dist"));
        assert_eq!(layout.template, PathBuf::from("/repo/public/package.json"));
        assert_eq!(
            layout.logo_path("io.a.app"),
            PathBuf::from("/repo/apps/io.a.app/logo.png")
        );
        assert_eq!(
            packed_logo_path(Path::new("/out"), "io.a.app"),
            PathBuf::from("/out/imgs/io.a.app.png")
        );
    }
}
