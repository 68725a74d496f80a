//! Schema revision switches.

use serde::{Deserialize, Serialize};

/// Switches selecting which revision of the manifest schema is enforced.
///
/// The catalog grew its rules over time. `Default` describes the latest
/// revision; [`SchemaOptions::legacy`] describes the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaOptions {
    /// `isVeWorldSupported` must be present (and boolean).
    pub require_is_veworld_supported: bool,
    /// No two apps may share a normalized domain and a display name.
    pub enforce_domain_uniqueness: bool,
    /// Full validation also issues a GET against every `href`.
    pub check_link_reachability: bool,
}

impl SchemaOptions {
    /// The legacy rule set: no VeWorld flag, no uniqueness pass, no link checks.
    pub const fn legacy() -> Self {
        Self {
            require_is_veworld_supported: false,
            enforce_domain_uniqueness: false,
            check_link_reachability: false,
        }
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            require_is_veworld_supported: true,
            enforce_domain_uniqueness: true,
            check_link_reachability: false,
        }
    }
}
