use std::sync::atomic::{AtomicU64, Ordering};

/// Invalidation state shared by every clone of a repository.
///
/// Each invalidation bumps a counter. A full read takes a token when it
/// starts and, on success, clears only the invalidations it saw, so one
/// that lands while the read is in flight stays pending.
#[derive(Debug, Default)]
pub(super) struct DirtyFlag {
    invalidated: AtomicU64,
    refreshed: AtomicU64,
}

impl DirtyFlag {
    pub(super) fn mark(&self) {
        self.invalidated.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn is_set(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst) > self.refreshed.load(Ordering::SeqCst)
    }

    /// Token for a read starting now.
    pub(super) fn begin(&self) -> u64 {
        self.invalidated.load(Ordering::SeqCst)
    }

    pub(super) fn clear(&self, token: u64) {
        self.refreshed.fetch_max(token, Ordering::SeqCst);
    }
}
