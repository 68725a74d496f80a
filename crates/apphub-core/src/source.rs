//! Catalog directory access.
//!
//! The validator and packer never touch the filesystem directly; they go
//! through [`AppSource`] so tests can feed them in-memory catalogs.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ValidationError};
use apphub_schema::MANIFEST_FILE;

/// What a directory entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets and anything else that is neither.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Read access to the `apps/` tree.
///
/// Listings are returned sorted by name so every run enumerates apps in the
/// same order.
#[async_trait]
pub trait AppSource: Send + Sync {
    /// List the apps root.
    async fn list_root(&self) -> Result<Vec<Entry>>;

    /// List one app directory.
    async fn list_app(&self, id: &str) -> Result<Vec<Entry>>;

    /// Read a file inside an app directory.
    async fn read_file(&self, id: &str, name: &str) -> Result<Vec<u8>>;
}

/// Read `manifest.json` of an app as a JSON object.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedManifest`] if the file is not JSON or
/// not an object, and an I/O error if it cannot be read.
pub async fn read_manifest_object(source: &dyn AppSource, id: &str) -> Result<Map<String, Value>> {
    let bytes = source.read_file(id, MANIFEST_FILE).await?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ValidationError::MalformedManifest(e.to_string()))?;
    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(ValidationError::MalformedManifest(format!(
            "expected an object, found {}",
            json_kind(&other)
        ))
        .into()),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// [`AppSource`] over a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAppSource {
    root: PathBuf,
}

impl FsAppSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn list(dir: &Path) -> Result<Vec<Entry>> {
        let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| {
            Error::context("failed to read directory", format!("{}: {e}", dir.display()))
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[async_trait]
impl AppSource for FsAppSource {
    async fn list_root(&self) -> Result<Vec<Entry>> {
        Self::list(&self.root).await
    }

    async fn list_app(&self, id: &str) -> Result<Vec<Entry>> {
        Self::list(&self.root.join(id)).await
    }

    async fn read_file(&self, id: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(id).join(name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::context("failed to read file", format!("{}: {e}", path.display())))
    }
}
