pub mod compress;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod image;
pub mod pack;
pub mod paths;
pub mod select;
pub mod source;
pub mod validate;

pub mod reporter;

pub use error::{Error, Result, ValidationError};
pub use reporter::{NullReporter, Reporter};

/// User Agent string for outgoing HTTP requests
pub const USER_AGENT: &str = concat!("apphub/", env!("CARGO_PKG_VERSION"));
