//! Error types for validation and packing.
//!
//! [`ValidationError`] is a malformed submission: expected, user-facing, and the
//! only kind that is reported back on a pull request. [`Error`] wraps it
//! together with the infrastructure failures (git, filesystem, HTTP).

use apphub_schema::{FieldError, InvalidBundleId};
use thiserror::Error;

/// A submission that breaks a catalog rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid app bundle id: {0}")]
    InvalidBundleId(String),

    #[error("folders are not allowed in app directory")]
    DisallowedEntry(String),

    #[error("{0} is not allowed")]
    DisallowedFile(String),

    #[error("{0} is required")]
    MissingFile(String),

    #[error("{0}")]
    InvalidLogo(LogoProblem),

    #[error("manifest.json is not a valid JSON object: {0}")]
    MalformedManifest(String),

    #[error("{reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid file in apps dir: {0}")]
    StrayFile(String),

    #[error("duplicate name \"{name}\" for domain {domain}: {}", apps.join(", "))]
    DuplicateNameForDomain {
        domain: String,
        name: String,
        apps: Vec<String>,
    },

    #[error("{0}")]
    ScopeViolation(String),

    #[error("href {href} is unreachable: {reason}")]
    UnreachableHref { href: String, reason: String },
}

/// Why a logo was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoProblem {
    #[error("logo should be image file in png format")]
    NotPng,

    #[error("logo should be 512x512 in pixel size")]
    WrongSize { width: u32, height: u32 },
}

impl From<InvalidBundleId> for ValidationError {
    fn from(err: InvalidBundleId) -> Self {
        Self::InvalidBundleId(err.0)
    }
}

impl From<FieldError> for ValidationError {
    fn from(err: FieldError) -> Self {
        Self::InvalidField {
            field: err.field,
            reason: err.reason,
        }
    }
}

/// Any failure of a validation or packing run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("check {id} -> {source}")]
    Check {
        id: String,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("git: {0}")]
    Git(String),

    #[error("{tool}: {message}")]
    Tool { tool: &'static str, message: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("{context}: {message}")]
    Context {
        context: &'static str,
        message: String,
    },
}

impl Error {
    /// Create an error with context for better debugging.
    pub fn context(ctx: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Context {
            context: ctx,
            message: msg.to_string(),
        }
    }

    /// Attribute this error to one app, as `check <id> -> <message>`.
    pub fn in_app(self, id: impl Into<String>) -> Self {
        Self::Check {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// The underlying validation error, looking through `check` wrappers.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            Self::Check { source, .. } => source.as_validation(),
            _ => None,
        }
    }

    /// Whether this is a rule violation rather than an infrastructure failure.
    pub fn is_validation(&self) -> bool {
        self.as_validation().is_some()
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_wrapper_message() {
        let err = Error::from(ValidationError::MissingFile("logo.png".into())).in_app("io.a.app");
        assert_eq!(err.to_string(), "check io.a.app -> logo.png is required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_infra_errors_are_not_validation() {
        let err = Error::Git("exit status 128".into()).in_app("io.a.app");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "check io.a.app -> git: exit status 128");
    }

    #[test]
    fn test_duplicate_lists_every_app() {
        let err = ValidationError::DuplicateNameForDomain {
            domain: "example.com".into(),
            name: "Example".into(),
            apps: vec!["io.a.app".into(), "io.b.app".into(), "io.c.app".into()],
        };
        assert_eq!(
            err.to_string(),
            "duplicate name \"Example\" for domain example.com: io.a.app, io.b.app, io.c.app"
        );
    }

    #[test]
    fn test_logo_messages() {
        let size = ValidationError::InvalidLogo(LogoProblem::WrongSize {
            width: 256,
            height: 256,
        });
        assert_eq!(size.to_string(), "logo should be 512x512 in pixel size");
        let fmt = ValidationError::InvalidLogo(LogoProblem::NotPng);
        assert_eq!(fmt.to_string(), "logo should be image file in png format");
    }
}
