//! Logo compression for the packed output.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Writes a compressed copy of a logo.
#[async_trait]
pub trait LogoCompressor: Send + Sync {
    async fn compress(&self, src: &Path, dest: &Path) -> Result<()>;
}

/// Lossy PNG quantisation through the `pngquant` executable.
#[derive(Debug, Clone)]
pub struct Pngquant {
    program: PathBuf,
}

impl Pngquant {
    /// Find `pngquant` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if it is not installed.
    pub fn locate() -> Result<Self> {
        let program = which::which("pngquant").map_err(|e| Error::Tool {
            tool: "pngquant",
            message: format!("not found on PATH ({e}); install it or pack with --no-compress"),
        })?;
        Ok(Self { program })
    }
}

#[async_trait]
impl LogoCompressor for Pngquant {
    async fn compress(&self, src: &Path, dest: &Path) -> Result<()> {
        let output = tokio::process::Command::new(&self.program)
            .arg("--force")
            .arg("--output")
            .arg(dest)
            .arg("--")
            .arg(src)
            .output()
            .await
            .map_err(|e| Error::Tool {
                tool: "pngquant",
                message: format!("failed to spawn: {e}"),
            })?;

        if !output.status.success() {
            return Err(Error::Tool {
                tool: "pngquant",
                message: format!(
                    "{} exited with {}: {}",
                    src.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}

/// Copies logos verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyCompressor;

#[async_trait]
impl LogoCompressor for CopyCompressor {
    async fn compress(&self, src: &Path, dest: &Path) -> Result<()> {
        tokio::fs::copy(src, dest)
            .await
            .map_err(|e| Error::context("failed to copy logo", format!("{}: {e}", src.display())))?;
        Ok(())
    }
}
