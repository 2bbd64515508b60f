//! Freshness decisions for cached batches.

use crate::config::CacheConfig;
use crate::domain::ResourceKind;
use crate::models::Record;

/// What to do with the batch currently stored for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Nothing stored yet.
    Fetch,
    /// Stored batch is usable as is.
    Serve,
    /// Stored batch has expired and must be deleted before refetching.
    Refresh,
}

/// A batch is stale when its first row is older than `window_ms`.
///
/// Rows of a batch share one `created_at`, so the first row speaks for all of
/// them. An empty batch is always stale.
#[must_use]
pub fn is_stale(batch: &[Record], window_ms: u64, now_ms: i64) -> bool {
    let window = i64::try_from(window_ms).unwrap_or(i64::MAX);
    batch
        .first()
        .is_none_or(|first| now_ms.saturating_sub(first.created_at()) > window)
}

#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    windows: CacheConfig,
}

impl CachePolicy {
    #[must_use]
    pub const fn new(windows: CacheConfig) -> Self {
        Self { windows }
    }

    #[must_use]
    pub const fn window_for(&self, kind: ResourceKind) -> Option<u64> {
        self.windows.window_for(kind)
    }

    /// Kinds without a window never expire once cached.
    #[must_use]
    pub fn decide(&self, kind: ResourceKind, batch: &[Record], now_ms: i64) -> CacheDecision {
        if batch.is_empty() {
            return CacheDecision::Fetch;
        }

        match self.window_for(kind) {
            Some(window) if is_stale(batch, window, now_ms) => CacheDecision::Refresh,
            _ => CacheDecision::Serve,
        }
    }
}
