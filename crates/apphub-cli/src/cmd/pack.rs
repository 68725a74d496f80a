//! Pack command
use anyhow::Result;
use std::path::Path;

use apphub_core::Reporter;
use apphub_core::compress::{CopyCompressor, LogoCompressor, Pngquant};
use apphub_core::git::{Git, GitHistory};
use apphub_core::pack::{PackOptions, PackSummary, Packer};

use super::Workspace;
use crate::ui::{ConsoleReporter, print_failure, print_success};

/// Pack the catalog into `out` (or the configured `dist/`).
pub async fn pack(
    root: &Path,
    config: Option<&Path>,
    out: Option<&Path>,
    no_compress: bool,
) -> Result<()> {
    let ws = match Workspace::load(root, config) {
        Ok(ws) => ws,
        Err(e) => {
            print_failure("Pack apps failed", &format!("{e:#}"));
            return Err(e);
        }
    };
    let reporter = ConsoleReporter::new();

    match run(&ws, out, no_compress, &reporter).await {
        Ok(summary) => {
            reporter.info(&format!(
                "{} apps in index, {} in sync list, written to {}",
                summary.apps,
                summary.synced,
                summary.out.display()
            ));
            print_success(&format!("Packed {} apps. Congrats!", summary.apps));
            Ok(())
        }
        Err(err) => {
            print_failure("Pack apps failed", &err.to_string());
            Err(err.into())
        }
    }
}

async fn run(
    ws: &Workspace,
    out: Option<&Path>,
    no_compress: bool,
    reporter: &dyn Reporter,
) -> apphub_core::Result<PackSummary> {
    let mut layout = ws.layout.clone();
    if let Some(out) = out {
        layout.dist = out.to_path_buf();
    }

    let times = GitHistory::new(Git::locate(&ws.root)?, &layout.apps);
    let compressor: Box<dyn LogoCompressor> = if no_compress {
        Box::new(CopyCompressor)
    } else {
        Box::new(Pngquant::locate()?)
    };
    let opts = PackOptions {
        ci: ws.ci.ci,
        promoted: ws.config.sync.promoted.clone(),
        policy: ws.config.sync.policy(),
    };

    Packer::new(layout, &times, compressor.as_ref(), opts)
        .pack(reporter)
        .await
}
