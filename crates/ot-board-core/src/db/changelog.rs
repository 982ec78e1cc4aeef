//! Change log read operations.
//!
//! Writes go through `Database::commit_update`, which appends and prunes in
//! the same transaction as the roster upsert.

use rusqlite::params;

use super::{stage_from_token, Database, DbResult};
use crate::models::ChangeEvent;

impl Database {
    /// Most recent events, newest first, at most `limit`.
    pub fn recent_events(&self, limit: usize) -> DbResult<Vec<ChangeEvent>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT event_id, uhid, name, stage, recorded_at
            FROM change_log
            ORDER BY recorded_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(EventRow {
                event_id: row.get(0)?,
                uhid: row.get(1)?,
                name: row.get(2)?,
                stage: row.get(3)?,
                recorded_at: row.get(4)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.try_into()?);
        }
        Ok(events)
    }

    /// Total events currently retained.
    pub fn event_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM change_log", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

/// Intermediate row struct for database mapping.
struct EventRow {
    event_id: String,
    uhid: String,
    name: String,
    stage: String,
    recorded_at: i64,
}

impl TryFrom<EventRow> for ChangeEvent {
    type Error = super::DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(ChangeEvent {
            event_id: row.event_id,
            uhid: row.uhid,
            name: row.name,
            stage: stage_from_token(&row.stage)?,
            recorded_at: row.recorded_at,
        })
    }
}
