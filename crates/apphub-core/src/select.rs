//! Sync-list selection.
//!
//! Constrained clients only receive a bounded slice of the catalog. The
//! newest apps fill most of it, and up to a few promoted apps are
//! guaranteed a slot at the end.

use std::collections::HashSet;

use apphub_schema::PackedApp;

/// Size of the sync list.
pub const SYNC_APP_COUNT: usize = 10;

/// Upper bound on promoted apps in the sync list.
pub const MAX_PROMOTED: usize = 3;

/// Anything carrying a bundle id.
pub trait Listed {
    fn bundle_id(&self) -> &str;
}

impl Listed for PackedApp {
    fn bundle_id(&self) -> &str {
        self.id().as_str()
    }
}

impl Listed for String {
    fn bundle_id(&self) -> &str {
        self
    }
}

impl Listed for &str {
    fn bundle_id(&self) -> &str {
        self
    }
}

/// Shape of the sync list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub count: usize,
    pub max_promoted: usize,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            count: SYNC_APP_COUNT,
            max_promoted: MAX_PROMOTED,
        }
    }
}

impl SyncPolicy {
    /// Pick the sync list from `apps` (already sorted newest first).
    ///
    /// Fewer than `count` apps are returned unchanged. Otherwise the list is
    /// the first `count - max_promoted` apps, then non-promoted backfill from
    /// the remainder, then up to `max_promoted` promoted apps from the
    /// remainder. Promoted apps always come last.
    pub fn pick<T: Listed + Clone>(&self, apps: &[T], promoted: &[String]) -> Vec<T> {
        if apps.len() < self.count {
            return apps.to_vec();
        }

        let allow: HashSet<&str> = promoted.iter().map(String::as_str).collect();
        let head = self.count.saturating_sub(self.max_promoted);
        let (first, rest) = apps.split_at(head.min(apps.len()));

        let picked_promoted: Vec<T> = rest
            .iter()
            .filter(|app| allow.contains(app.bundle_id()))
            .take(self.max_promoted)
            .cloned()
            .collect();

        let mut sync = first.to_vec();
        for app in rest {
            if sync.len() + picked_promoted.len() >= self.count {
                break;
            }
            if !allow.contains(app.bundle_id()) {
                sync.push(app.clone());
            }
        }

        sync.extend(picked_promoted);
        sync
    }
}

/// [`SyncPolicy::pick`] with the default policy.
pub fn pick_sync_list<T: Listed + Clone>(apps: &[T], promoted: &[String]) -> Vec<T> {
    SyncPolicy::default().pick(apps, promoted)
}
