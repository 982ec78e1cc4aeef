//! Stale-tolerant advisory cache for the display ticker.

use std::sync::RwLock;

use tracing::warn;

use crate::source::TipSource;

/// Text shown before the first successful fetch.
pub const PLACEHOLDER_TIP: &str = "Loading helpful health tips...";

/// Holds the last successfully fetched advisory line.
///
/// `refresh` is driven on a fixed cadence by the owning view's poll task. A
/// failed or empty fetch leaves the previous line in place and surfaces
/// nothing to the scheduler; reads never wait on a fetch in flight.
pub struct AdvisoryTicker {
    current: RwLock<String>,
}

impl AdvisoryTicker {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(PLACEHOLDER_TIP.to_string()),
        }
    }

    /// The line currently on display.
    pub fn current(&self) -> String {
        match self.current.read() {
            Ok(text) => text.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Fetch a new line from `source`, keeping the old one on failure.
    pub async fn refresh<S: TipSource + ?Sized>(&self, source: &S) {
        match source.fetch_tip().await {
            Ok(tip) if !tip.trim().is_empty() => {
                let mut current = match self.current.write() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                *current = tip.trim().to_string();
            }
            Ok(_) => warn!("advisory source returned an empty tip, keeping previous text"),
            Err(error) => warn!(%error, "advisory fetch failed, keeping previous text"),
        }
    }
}

impl Default for AdvisoryTicker {
    fn default() -> Self {
        Self::new()
    }
}
