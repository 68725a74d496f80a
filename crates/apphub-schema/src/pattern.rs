//! Field patterns shared by the validator and the packer.

use regex::Regex;
use std::sync::LazyLock;

// Labels are lowercase alphanumerics and inner hyphens; at least two labels.
static BUNDLE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z0-9]([a-z0-9-]*[a-z0-9])?$")
        .expect("valid regex")
});

// Prefix match only: anything may follow the host and optional port.
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(http(s?)://)([a-zA-Z0-9.-]+)(:[0-9]{1,4})?").expect("valid regex")
});

static CONTRACT_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-f0-9]{40}$").expect("valid regex"));

/// Whether `s` is a reverse-domain bundle id such as `io.example.app`.
///
/// # Example
///
/// ```
/// use apphub_schema::pattern::is_bundle_id;
///
/// assert!(is_bundle_id("io.example.app"));
/// assert!(!is_bundle_id("foo"));
/// assert!(!is_bundle_id("Io.Example"));
/// ```
pub fn is_bundle_id(s: &str) -> bool {
    BUNDLE_ID.is_match(s)
}

/// Whether `s` starts with an `http://` or `https://` origin.
pub fn is_http_url(s: &str) -> bool {
    HTTP_URL.is_match(s)
}

/// Host portion of an http(s) URL as matched by [`is_http_url`].
pub fn url_host(s: &str) -> Option<&str> {
    HTTP_URL
        .captures(s)
        .and_then(|c| c.get(3))
        .map(|m| m.as_str())
}

/// Whether `s` is a lowercase `0x`-prefixed 20-byte hex address.
pub fn is_contract_address(s: &str) -> bool {
    CONTRACT_ADDRESS.is_match(s)
}
