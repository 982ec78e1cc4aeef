//! Recency feed configuration.

/// Retention policy for the change log.
///
/// The bound is count-based: each write prunes the log down to the `retain`
/// newest events inside the same transaction, so the feed's footprint is
/// fixed by configuration rather than lifetime write volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Maximum events kept in the change log
    pub retain: usize,
    /// Events returned by `recent_updates` when the caller gives no limit
    pub default_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retain: 50,
            default_limit: 10,
        }
    }
}
