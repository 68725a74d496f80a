//! Reporter trait for dependency injection
//!
//! Validation and packing report progress through this trait so the core
//! stays free of any terminal handling.

pub trait Reporter: Send + Sync {
    /// A new phase has started (e.g. "validating apps").
    fn section(&self, title: &str);

    /// An app passed its checks.
    fn checked(&self, app_id: &str);

    /// An app was written to the output, with its creation time (epoch ms).
    fn packed(&self, app_id: &str, create_at: i64);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Something was skipped but the run goes on.
    fn warning(&self, msg: &str);

    /// End of a run: `count` apps went through `action` ("validated", "packed").
    fn summary(&self, count: usize, action: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn checked(&self, app_id: &str) {
        (**self).checked(app_id);
    }
    fn packed(&self, app_id: &str, create_at: i64) {
        (**self).packed(app_id, create_at);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn summary(&self, count: usize, action: &str) {
        (**self).summary(count, action);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn checked(&self, _: &str) {}
    fn packed(&self, _: &str, _: i64) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: usize, _: &str) {}
}
