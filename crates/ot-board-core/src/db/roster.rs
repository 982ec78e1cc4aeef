//! Roster table operations.

use rusqlite::{params, OptionalExtension};

use super::{stage_from_token, Database, DbError, DbResult};
use crate::models::{ChangeEvent, PatientRecord};

impl Database {
    /// Commit one roster write: upsert the record, append its change event,
    /// and prune the change log to the `retain` newest entries, all in one
    /// transaction. Readers never observe a roster row without its event.
    pub fn commit_update(
        &mut self,
        record: &PatientRecord,
        event: &ChangeEvent,
        retain: usize,
    ) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO ot_roster (uhid, name, stage, last_updated)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(uhid) DO UPDATE SET
                name = excluded.name,
                stage = excluded.stage,
                last_updated = excluded.last_updated
            "#,
            params![
                record.uhid,
                record.name,
                record.stage.as_str(),
                record.last_updated,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO change_log (event_id, uhid, name, stage, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                event.event_id,
                event.uhid,
                event.name,
                event.stage.as_str(),
                event.recorded_at,
            ],
        )?;

        tx.execute(
            r#"
            DELETE FROM change_log WHERE event_id NOT IN (
                SELECT event_id FROM change_log
                ORDER BY recorded_at DESC, rowid DESC
                LIMIT ?1
            )
            "#,
            params![retain as i64],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Get a record by canonical UHID.
    pub fn get_record(&self, uhid: &str) -> DbResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                r#"
                SELECT uhid, name, stage, last_updated
                FROM ot_roster
                WHERE uhid = ?
                "#,
                [uhid],
                |row| {
                    Ok(RosterRow {
                        uhid: row.get(0)?,
                        name: row.get(1)?,
                        stage: row.get(2)?,
                        last_updated: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all records in insertion order.
    pub fn list_records(&self) -> DbResult<Vec<PatientRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT uhid, name, stage, last_updated
            FROM ot_roster
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RosterRow {
                uhid: row.get(0)?,
                name: row.get(1)?,
                stage: row.get(2)?,
                last_updated: row.get(3)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// Delete a record by canonical UHID.
    pub fn delete_record(&self, uhid: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM ot_roster WHERE uhid = ?", [uhid])?;
        Ok(rows_affected > 0)
    }

    /// Highest timestamp present anywhere in the store.
    ///
    /// Seeds the board's write clock on open so stamps never regress across
    /// a restart.
    pub fn latest_timestamp(&self) -> DbResult<i64> {
        let roster: Option<i64> =
            self.conn
                .query_row("SELECT MAX(last_updated) FROM ot_roster", [], |r| r.get(0))?;
        let log: Option<i64> =
            self.conn
                .query_row("SELECT MAX(recorded_at) FROM change_log", [], |r| r.get(0))?;
        Ok(roster.unwrap_or(0).max(log.unwrap_or(0)))
    }
}

/// Intermediate row struct for database mapping.
struct RosterRow {
    uhid: String,
    name: String,
    stage: String,
    last_updated: i64,
}

impl TryFrom<RosterRow> for PatientRecord {
    type Error = DbError;

    fn try_from(row: RosterRow) -> Result<Self, Self::Error> {
        Ok(PatientRecord {
            uhid: row.uhid,
            name: row.name,
            stage: stage_from_token(&row.stage)?,
            last_updated: row.last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OtStage;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_record(uhid: &str, name: &str, stage: OtStage, stamp: i64) -> PatientRecord {
        PatientRecord {
            uhid: uhid.into(),
            name: name.into(),
            stage,
            last_updated: stamp,
        }
    }

    fn commit(db: &mut Database, record: &PatientRecord) {
        let event = ChangeEvent::for_record(record);
        db.commit_update(record, &event, 50).unwrap();
    }

    #[test]
    fn test_commit_and_get() {
        let mut db = setup_db();
        let record = make_record("AB12", "J. Doe", OtStage::Waiting, 100);
        commit(&mut db, &record);

        let retrieved = db.get_record("AB12").unwrap().unwrap();
        assert_eq!(retrieved, record);
        assert!(db.get_record("ZZ99").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_insertion_order_across_upserts() {
        let mut db = setup_db();
        commit(&mut db, &make_record("AB12", "A", OtStage::Waiting, 1));
        commit(&mut db, &make_record("CD34", "B", OtStage::Waiting, 2));
        // Re-upsert the first patient; it must not move to the end.
        commit(&mut db, &make_record("AB12", "A", OtStage::Recovery, 3));

        let listed = db.list_records().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].uhid, "AB12");
        assert_eq!(listed[0].stage, OtStage::Recovery);
        assert_eq!(listed[1].uhid, "CD34");
    }

    #[test]
    fn test_delete_record() {
        let mut db = setup_db();
        commit(&mut db, &make_record("AB12", "A", OtStage::Waiting, 1));

        assert!(db.delete_record("AB12").unwrap());
        assert!(!db.delete_record("AB12").unwrap());
        assert!(db.get_record("AB12").unwrap().is_none());
    }

    #[test]
    fn test_latest_timestamp_spans_roster_and_log() {
        let mut db = setup_db();
        assert_eq!(db.latest_timestamp().unwrap(), 0);

        commit(&mut db, &make_record("AB12", "A", OtStage::Waiting, 7));
        commit(&mut db, &make_record("AB12", "A", OtStage::Recovery, 9));
        db.delete_record("AB12").unwrap();

        // Roster is empty, but the log still carries the high-water mark.
        assert_eq!(db.latest_timestamp().unwrap(), 9);
    }
}
