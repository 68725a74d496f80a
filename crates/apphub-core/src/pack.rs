//! Catalog packing.
//!
//! Produces the client-facing output directory:
//!
//! ```text
//! dist/
//!   package.json      copied from the template
//!   imgs/<id>.png     compressed logos
//!   index.json        every app, newest first
//!   sync.json         the bounded sync list
//! ```
//!
//! Everything is resolved before anything is written, and the output is
//! staged next to `dist/` and swapped in at the end. A failed run leaves
//! the previous `dist/` untouched.

use std::path::{Path, PathBuf};

use apphub_schema::{BundleId, PackedApp};

use crate::Reporter;
use crate::compress::LogoCompressor;
use crate::error::{Error, Result, ValidationError};
use crate::git::CreationTimeSource;
use crate::paths::{IMGS_DIR, INDEX_FILE, Layout, PACKAGE_FILE, SYNC_FILE, packed_logo_path};
use crate::select::SyncPolicy;
use crate::source::{AppSource, FsAppSource, read_manifest_object};
use crate::validate::list_app_dirs;

/// Packing switches.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Running under CI: a stray `.DS_Store` in the apps root is an error.
    pub ci: bool,
    /// Bundle ids guaranteed a slot in the sync list.
    pub promoted: Vec<String>,
    pub policy: SyncPolicy,
}

/// What a pack run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    pub apps: usize,
    pub synced: usize,
    pub out: PathBuf,
}

/// Sort by `createAt`, newest first. Ties keep their order.
pub fn sort_newest_first(apps: &mut [PackedApp]) {
    apps.sort_by(|a, b| b.create_at().cmp(&a.create_at()));
}

pub struct Packer<'a> {
    layout: Layout,
    times: &'a dyn CreationTimeSource,
    compressor: &'a dyn LogoCompressor,
    opts: PackOptions,
}

impl std::fmt::Debug for Packer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packer")
            .field("layout", &self.layout)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl<'a> Packer<'a> {
    pub fn new(
        layout: Layout,
        times: &'a dyn CreationTimeSource,
        compressor: &'a dyn LogoCompressor,
        opts: PackOptions,
    ) -> Self {
        Self {
            layout,
            times,
            compressor,
            opts,
        }
    }

    /// Read every app and attach its creation time, sorted newest first.
    ///
    /// # Errors
    ///
    /// Returns the first unreadable manifest or unresolvable timestamp,
    /// attributed to its app.
    pub async fn collect(&self, reporter: &dyn Reporter) -> Result<Vec<PackedApp>> {
        reporter.section("collecting apps");
        let source = FsAppSource::new(&self.layout.apps);
        let mut apps = Vec::new();

        for name in list_app_dirs(&source, self.opts.ci).await? {
            let app = self.collect_one(&source, &name).await.map_err(|e| e.in_app(&name))?;
            tracing::debug!(app = %name, create_at = app.create_at(), "collected");
            apps.push(app);
        }

        sort_newest_first(&mut apps);
        Ok(apps)
    }

    async fn collect_one(&self, source: &dyn AppSource, name: &str) -> Result<PackedApp> {
        let id = BundleId::new(name).map_err(ValidationError::from)?;
        let manifest = read_manifest_object(source, name).await?;
        let create_at = self.times.created_at(name).await?;
        Ok(PackedApp::new(id, create_at, manifest))
    }

    /// Collect, select and write the output directory.
    ///
    /// # Errors
    ///
    /// Returns the first failure. The existing output directory is only
    /// replaced once the new one is complete.
    pub async fn pack(&self, reporter: &dyn Reporter) -> Result<PackSummary> {
        let apps = self.collect(reporter).await?;
        let sync = self.opts.policy.pick(&apps, &self.opts.promoted);

        let dist = &self.layout.dist;
        let parent = match dist.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await?;
        let staged = tempfile::Builder::new()
            .prefix(".apphub-dist-")
            .tempdir_in(&parent)
            .map_err(|e| Error::context("failed to create staging directory", e))?;

        reporter.section("writing output");
        self.write_output(staged.path(), &apps, &sync, reporter).await?;
        swap_into_place(staged, dist).await?;

        tracing::info!(apps = apps.len(), synced = sync.len(), out = %dist.display(), "packed");
        reporter.summary(apps.len(), "packed");
        Ok(PackSummary {
            apps: apps.len(),
            synced: sync.len(),
            out: dist.clone(),
        })
    }

    async fn write_output(
        &self,
        out: &Path,
        apps: &[PackedApp],
        sync: &[PackedApp],
        reporter: &dyn Reporter,
    ) -> Result<()> {
        tokio::fs::create_dir_all(out.join(IMGS_DIR)).await?;
        tokio::fs::copy(&self.layout.template, out.join(PACKAGE_FILE))
            .await
            .map_err(|e| {
                Error::context(
                    "failed to copy package template",
                    format!("{}: {e}", self.layout.template.display()),
                )
            })?;

        for app in apps {
            let id = app.id().as_str();
            self.compressor
                .compress(&self.layout.logo_path(id), &packed_logo_path(out, id))
                .await
                .map_err(|e| e.in_app(id))?;
            reporter.packed(id, app.create_at());
        }

        tokio::fs::write(out.join(INDEX_FILE), serde_json::to_string(apps)?).await?;
        tokio::fs::write(out.join(SYNC_FILE), serde_json::to_string(sync)?).await?;
        Ok(())
    }
}

async fn swap_into_place(staged: tempfile::TempDir, dist: &Path) -> Result<()> {
    if tokio::fs::try_exists(dist).await? {
        tokio::fs::remove_dir_all(dist).await.map_err(|e| {
            Error::context("failed to clear output", format!("{}: {e}", dist.display()))
        })?;
    }
    tokio::fs::rename(staged.path(), dist).await.map_err(|e| {
        Error::context("failed to move output into place", format!("{}: {e}", dist.display()))
    })?;
    let _ = staged.keep();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullReporter;
    use crate::compress::CopyCompressor;
    use crate::reporter::recording::Recorder;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    struct FixedTimes(HashMap<String, i64>);

    #[async_trait]
    impl CreationTimeSource for FixedTimes {
        async fn created_at(&self, app_id: &str) -> Result<i64> {
            self.0.get(app_id).copied().ok_or_else(|| {
                Error::Git(format!(
                    "can not find create time from git for dir: {app_id}"
                ))
            })
        }
    }

    fn times(entries: &[(&str, i64)]) -> FixedTimes {
        FixedTimes(entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect())
    }

    fn write_app(root: &Path, id: &str, name: &str) {
        let dir = root.join("apps").join(id);
        std::fs::create_dir_all(&dir).unwrap();
        // Key order here is the key order expected in the output.
        std::fs::write(
            dir.join("manifest.json"),
            format!(r#"{{"name":"{name}","href":"https://{id}","category":"defi","tags":["x"]}}"#),
        )
        .unwrap();
        std::fs::write(dir.join("logo.png"), format!("logo of {id}")).unwrap();
    }

    fn repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public/package.json"), br#"{"name":"app-hub"}"#).unwrap();
        write_app(dir.path(), "io.a.app", "A");
        write_app(dir.path(), "io.b.app", "B");
        write_app(dir.path(), "io.c.app", "C");
        std::fs::write(dir.path().join("apps/.gitkeep"), b"").unwrap();
        dir
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_pack_writes_sorted_output() {
        let dir = repo();
        let layout = Layout::new(dir.path());
        let times = times(&[("io.a.app", 100), ("io.b.app", 300), ("io.c.app", 200)]);
        let packer = Packer::new(layout.clone(), &times, &CopyCompressor, PackOptions::default());

        let recorder = Recorder::default();
        let summary = packer.pack(&recorder).await.unwrap();
        assert_eq!(summary.apps, 3);
        assert_eq!(summary.synced, 3);
        let lines = recorder.lines();
        assert!(lines.contains(&"packed io.b.app 300".to_string()), "{lines:?}");
        assert_eq!(lines.last().map(String::as_str), Some("summary 3 packed"));

        let index = read_json(&layout.dist.join(INDEX_FILE));
        let ids: Vec<&str> = index
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["io.b.app", "io.c.app", "io.a.app"]);
        assert_eq!(index[0]["createAt"], json!(300));

        let keys: Vec<&String> = index[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "href", "category", "tags", "id", "createAt"]);

        assert_eq!(
            std::fs::read(packed_logo_path(&layout.dist, "io.a.app")).unwrap(),
            b"logo of io.a.app"
        );
        assert_eq!(read_json(&layout.dist.join(PACKAGE_FILE)), json!({"name": "app-hub"}));
        assert_eq!(read_json(&layout.dist.join(SYNC_FILE)), index);
    }

    #[tokio::test]
    async fn test_pack_is_idempotent() {
        let dir = repo();
        let layout = Layout::new(dir.path());
        let times = times(&[("io.a.app", 100), ("io.b.app", 100), ("io.c.app", 100)]);
        let packer = Packer::new(layout.clone(), &times, &CopyCompressor, PackOptions::default());

        packer.pack(&NullReporter).await.unwrap();
        let first_index = std::fs::read(layout.dist.join(INDEX_FILE)).unwrap();
        let first_sync = std::fs::read(layout.dist.join(SYNC_FILE)).unwrap();

        packer.pack(&NullReporter).await.unwrap();
        assert_eq!(std::fs::read(layout.dist.join(INDEX_FILE)).unwrap(), first_index);
        assert_eq!(std::fs::read(layout.dist.join(SYNC_FILE)).unwrap(), first_sync);

        // Equal timestamps keep enumeration order.
        let index: Value = serde_json::from_slice(&first_index).unwrap();
        assert_eq!(index[0]["id"], "io.a.app");
        assert_eq!(index[2]["id"], "io.c.app");
    }

    #[tokio::test]
    async fn test_failed_pack_keeps_previous_output() {
        let dir = repo();
        let layout = Layout::new(dir.path());
        std::fs::create_dir_all(&layout.dist).unwrap();
        std::fs::write(layout.dist.join(INDEX_FILE), b"previous").unwrap();

        let times = times(&[("io.a.app", 1), ("io.b.app", 2)]);
        let packer = Packer::new(layout.clone(), &times, &CopyCompressor, PackOptions::default());
        let err = packer.pack(&NullReporter).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "check io.c.app -> git: can not find create time from git for dir: io.c.app"
        );
        assert_eq!(std::fs::read(layout.dist.join(INDEX_FILE)).unwrap(), b"previous");

        // Missing template fails after collection; still nothing replaced.
        std::fs::remove_file(&layout.template).unwrap();
        let times = self::times(&[("io.a.app", 1), ("io.b.app", 2), ("io.c.app", 3)]);
        let packer = Packer::new(layout.clone(), &times, &CopyCompressor, PackOptions::default());
        assert!(packer.pack(&NullReporter).await.is_err());
        assert_eq!(std::fs::read(layout.dist.join(INDEX_FILE)).unwrap(), b"previous");

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".apphub-dist-"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_sort_is_stable_and_descending() {
        let app = |id: &str, at: i64| {
            PackedApp::new(BundleId::new(id).unwrap(), at, serde_json::Map::new())
        };
        let mut apps = vec![
            app("io.a.x", 1),
            app("io.b.x", 5),
            app("io.c.x", 1),
            app("io.d.x", 5),
        ];
        sort_newest_first(&mut apps);
        let ids: Vec<&str> = apps.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, ["io.b.x", "io.d.x", "io.a.x", "io.c.x"]);
    }

    #[tokio::test]
    async fn test_promoted_apps_land_in_sync_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public/package.json"), b"{}").unwrap();
        let mut entries = Vec::new();
        for i in 0..12_i64 {
            let id = format!("io.app.n{i:02}");
            write_app(dir.path(), &id, &format!("App {i}"));
            entries.push((id, 1000 - i));
        }
        let times = FixedTimes(entries.into_iter().collect());
        let opts = PackOptions {
            promoted: vec!["io.app.n11".into()],
            ..PackOptions::default()
        };
        let layout = Layout::new(dir.path());
        let packer = Packer::new(layout.clone(), &times, &CopyCompressor, opts);
        let summary = packer.pack(&NullReporter).await.unwrap();
        assert_eq!(summary.synced, 10);

        let sync = read_json(&layout.dist.join(SYNC_FILE));
        assert_eq!(sync[9]["id"], "io.app.n11");
        assert_eq!(sync[8]["id"], "io.app.n08");
    }
}
