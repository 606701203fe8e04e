//! Display retry policy
//!
//! A resource can fetch successfully and still fail to render (the
//! thumbnail file may not be flushed yet). Each display failure triggers
//! one re-fetch, up to a fixed total number of attempts per cache key;
//! every attempt is tagged with a distinct reference suffix so the
//! presentation layer can tell a genuinely new attempt from a cached one.

use dashmap::DashMap;

use crate::QueryKey;

/// Total fetch attempts allowed per key, the initial fetch included.
pub const MAX_DISPLAY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-fetch; `attempt` is the index the new reference will carry.
    Retry { attempt: u32 },
    /// All attempts used; the last reference stands.
    Exhausted,
}

/// Per-key display failure bookkeeping. Counters are scoped to the cache
/// key, not the rendered view, so remounting an item does not grant it a
/// fresh budget.
pub struct DisplayRetryPolicy {
    max_attempts: u32,
    failures: DashMap<QueryKey, u32>,
}

impl DisplayRetryPolicy {
    pub fn new() -> Self {
        Self::with_max_attempts(MAX_DISPLAY_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            failures: DashMap::new(),
        }
    }

    /// Number of display failures recorded for `key` so far.
    pub fn attempt(&self, key: &QueryKey) -> u32 {
        self.failures.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Record a display failure and decide whether to re-fetch.
    pub fn on_display_failure(&self, key: &QueryKey) -> RetryDecision {
        let mut count = self.failures.entry(key.clone()).or_insert(0);
        if *count + 1 < self.max_attempts {
            *count += 1;
            RetryDecision::Retry { attempt: *count }
        } else {
            *count = self.max_attempts;
            RetryDecision::Exhausted
        }
    }

    /// Tag `reference` with the current attempt index. Successive attempts
    /// for the same key produce observably distinct references.
    pub fn tag_reference(&self, key: &QueryKey, reference: &str) -> String {
        format!("{}#{}", reference, self.attempt(key))
    }

    /// Forget the failure history for `key` (called on a successful
    /// display).
    pub fn reset(&self, key: &QueryKey) {
        self.failures.remove(key);
    }
}

impl Default for DisplayRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
