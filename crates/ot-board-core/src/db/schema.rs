//! SQLite schema definition.

/// Complete database schema for the OT status board.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- OT Roster (current truth, one row per patient)
-- ============================================================================

-- rowid order is the board's insertion order; upserts must keep the original
-- row (ON CONFLICT DO UPDATE) so a re-upserted patient does not move.
CREATE TABLE IF NOT EXISTS ot_roster (
    uhid TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    stage TEXT NOT NULL,
    last_updated INTEGER NOT NULL
);

-- ============================================================================
-- Change Log (append-only, pruned to the configured retention)
-- ============================================================================

CREATE TABLE IF NOT EXISTS change_log (
    event_id TEXT PRIMARY KEY,
    uhid TEXT NOT NULL,
    name TEXT NOT NULL,
    stage TEXT NOT NULL,
    recorded_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_change_log_recorded_at ON change_log(recorded_at);
"#;
