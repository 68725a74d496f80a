//! Shared types and wire format for the apphub catalog.
//!
//! Both the validator and the packer read the same `manifest.json` shape.
//! This crate owns that shape, the patterns its fields must satisfy, and the
//! packed entry written into `index.json` / `sync.json`.

pub mod bundle;
pub mod manifest;
pub mod options;
pub mod packed;
pub mod pattern;

// Re-exports
pub use bundle::{BundleId, InvalidBundleId};
pub use manifest::{AppManifest, Category, FieldError, FieldErrors};
pub use options::SchemaOptions;
pub use packed::PackedApp;

/// File name of the manifest inside an app directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// File name of the logo inside an app directory.
pub const LOGO_FILE: &str = "logo.png";

/// Files every app directory must contain, and the only ones it may contain.
pub const REQUIRED_FILES: [&str; 2] = [MANIFEST_FILE, LOGO_FILE];

/// Finder metadata file, tolerated outside CI.
pub const DS_STORE: &str = ".DS_Store";

/// Placeholder kept in the apps root so git tracks the empty directory.
pub const GITKEEP: &str = ".gitkeep";

/// Required logo edge length in pixels.
pub const LOGO_SIZE: u32 = 512;
