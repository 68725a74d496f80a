//! apphub - catalog tooling for the app hub
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Validates app submissions and packs the catalog into the documents
//! clients download.
//!
//! # Repository Layout
//!
//! ```text
//! apps/<bundle-id>/
//! ├── manifest.json
//! └── logo.png
//! public/package.json   # template copied into dist/
//! apphub.toml           # optional configuration
//! dist/                 # pack output
//! ```

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "apphub")]
#[command(author, version, about = "apphub - validate and pack the app catalog")]
pub struct Cli {
    /// Repository root holding apps/ and public/
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/apphub.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the catalog, or the submitted app on a pull request
    Validate {
        #[command(subcommand)]
        command: Option<ValidateCommands>,
    },
    /// Pack every app into index.json, sync.json and compressed logos
    Pack {
        /// Output directory (default: <root>/dist)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Copy logos verbatim instead of running pngquant
        #[arg(long)]
        no_compress: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ValidateCommands {
    /// Only check that every href answers
    Link,
}
