//! The shared status board: single source of truth for patient OT state.
//!
//! One `StatusBoard` is constructed at process start and handed by reference
//! to every surface. The staff console is the only caller of the mutating
//! operations; the display board and ticker poll `list` and `recent_updates`
//! on their own timers (see [`crate::poll`]).

mod feed;

pub use feed::FeedConfig;

use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use crate::db::{Database, DbError};
use crate::models::{ChangeEvent, OtStage, PatientRecord};

/// Validation failures for staff input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("UHID must not be empty")]
    EmptyUhid,

    #[error("patient name must not be empty")]
    EmptyName,

    #[error("unknown OT stage: {0}")]
    UnknownStage(String),
}

/// Board errors.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for BoardError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        BoardError::Lock(e.to_string())
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Canonical UHID form: trimmed, uppercase.
///
/// Applied at every board entry point; callers never normalize.
fn canonical_uhid(raw: &str) -> String {
    raw.trim().to_uppercase()
}

struct BoardInner {
    db: Database,
    last_stamp: i64,
}

impl BoardInner {
    /// Issue the next write timestamp.
    ///
    /// Wall-clock time, bumped past the previous stamp so timestamps
    /// strictly increase even when two writes land in the same millisecond.
    fn next_stamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_stamp = now.max(self.last_stamp + 1);
        self.last_stamp
    }
}

/// The shared record store.
///
/// Every operation runs to completion under one lock, so writes are atomic
/// with respect to reads and to each other; no interleaving produces a torn
/// record.
pub struct StatusBoard {
    feed: FeedConfig,
    inner: Mutex<BoardInner>,
}

impl StatusBoard {
    /// Open a board backed by the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, feed: FeedConfig) -> BoardResult<Self> {
        Self::from_db(Database::open(path)?, feed)
    }

    /// Open a board with no backing file; state lives for the session only.
    pub fn in_memory(feed: FeedConfig) -> BoardResult<Self> {
        Self::from_db(Database::open_in_memory()?, feed)
    }

    fn from_db(db: Database, feed: FeedConfig) -> BoardResult<Self> {
        let last_stamp = db.latest_timestamp()?;
        Ok(Self {
            feed,
            inner: Mutex::new(BoardInner { db, last_stamp }),
        })
    }

    /// Insert or replace the record for `uhid`.
    ///
    /// `uhid` and `name` must be non-empty after trimming and `stage` must
    /// parse as a vocabulary member; any validation failure leaves the store
    /// untouched. The write timestamp is assigned here, never taken from the
    /// caller, and advances on every successful upsert even when no other
    /// field changes. The matching [`ChangeEvent`] is committed in the same
    /// transaction as the roster row.
    pub fn upsert(&self, uhid: &str, name: &str, stage: &str) -> BoardResult<PatientRecord> {
        let uhid = canonical_uhid(uhid);
        if uhid.is_empty() {
            return Err(ValidationError::EmptyUhid.into());
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let stage: OtStage = stage
            .parse()
            .map_err(|_| ValidationError::UnknownStage(stage.trim().to_string()))?;

        let mut inner = self.inner.lock()?;
        let record = PatientRecord {
            uhid,
            name: name.to_string(),
            stage,
            last_updated: inner.next_stamp(),
        };
        let event = ChangeEvent::for_record(&record);
        inner.db.commit_update(&record, &event, self.feed.retain)?;
        debug!(uhid = %record.uhid, stage = %record.stage, "roster upsert");
        Ok(record)
    }

    /// Remove the record for `uhid`, reporting whether one was present.
    ///
    /// Deleting an absent key is a no-op, not an error. Change events
    /// already recorded for the key stay in the feed until they age out.
    pub fn delete(&self, uhid: &str) -> BoardResult<bool> {
        let uhid = canonical_uhid(uhid);
        if uhid.is_empty() {
            return Ok(false);
        }
        let inner = self.inner.lock()?;
        let removed = inner.db.delete_record(&uhid)?;
        if removed {
            debug!(uhid = %uhid, "roster delete");
        }
        Ok(removed)
    }

    /// Point lookup; absence is `None`, never an error.
    pub fn get(&self, uhid: &str) -> BoardResult<Option<PatientRecord>> {
        let uhid = canonical_uhid(uhid);
        let inner = self.inner.lock()?;
        Ok(inner.db.get_record(&uhid)?)
    }

    /// All live records, in insertion order.
    pub fn list(&self) -> BoardResult<Vec<PatientRecord>> {
        let inner = self.inner.lock()?;
        Ok(inner.db.list_records()?)
    }

    /// Most recent changes, newest first.
    ///
    /// The feed is history, not a join against the roster: events for
    /// records deleted afterwards remain until the retention bound evicts
    /// them. `limit` defaults to [`FeedConfig::default_limit`].
    pub fn recent_updates(&self, limit: Option<usize>) -> BoardResult<Vec<ChangeEvent>> {
        let limit = limit.unwrap_or(self.feed.default_limit);
        let inner = self.inner.lock()?;
        Ok(inner.db.recent_events(limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board() -> StatusBoard {
        StatusBoard::in_memory(FeedConfig::default()).unwrap()
    }

    #[test]
    fn test_read_after_write() {
        let board = setup_board();
        board.upsert("7781", "J. Doe", "waiting").unwrap();

        let listed = board.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].uhid, "7781");
        assert_eq!(listed[0].name, "J. Doe");
        assert_eq!(listed[0].stage, OtStage::Waiting);
    }

    #[test]
    fn test_case_insensitive_identity() {
        let board = setup_board();
        let first = board.upsert("ab12", "J. Doe", "waiting").unwrap();
        let second = board.upsert("AB12", "J. Doe", "recovery").unwrap();

        let listed = board.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].uhid, "AB12");
        assert_eq!(listed[0].stage, OtStage::Recovery);
        assert!(second.last_updated > first.last_updated);
    }

    #[test]
    fn test_stamp_advances_without_field_changes() {
        let board = setup_board();
        let first = board.upsert("AB12", "J. Doe", "waiting").unwrap();
        let second = board.upsert("AB12", "J. Doe", "waiting").unwrap();

        assert!(second.last_updated > first.last_updated);
        assert_ne!(first.render_key(), second.render_key());
    }

    #[test]
    fn test_uhid_trimmed_and_uppercased() {
        let board = setup_board();
        board.upsert("  ab12  ", "J. Doe", "waiting").unwrap();

        assert!(board.get("AB12").unwrap().is_some());
        assert!(board.get(" ab12 ").unwrap().is_some());
    }

    #[test]
    fn test_delete_is_true_removal() {
        let board = setup_board();
        board.upsert("AB12", "J. Doe", "waiting").unwrap();

        assert!(board.delete("ab12").unwrap());
        assert!(board.list().unwrap().is_empty());
        assert!(board.get("AB12").unwrap().is_none());
        // Second delete is a "not found", never an error.
        assert!(!board.delete("AB12").unwrap());
    }

    #[test]
    fn test_validation_rejects_and_leaves_store_unchanged() {
        let board = setup_board();
        board.upsert("AB12", "J. Doe", "waiting").unwrap();

        let empty_uhid = board.upsert("   ", "X", "waiting");
        assert!(matches!(
            empty_uhid,
            Err(BoardError::Validation(ValidationError::EmptyUhid))
        ));

        let empty_name = board.upsert("CD34", "  ", "waiting");
        assert!(matches!(
            empty_name,
            Err(BoardError::Validation(ValidationError::EmptyName))
        ));

        let bad_stage = board.upsert("CD34", "X", "unknown-status");
        assert!(matches!(
            bad_stage,
            Err(BoardError::Validation(ValidationError::UnknownStage(_)))
        ));

        let listed = board.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].uhid, "AB12");
        assert_eq!(board.recent_updates(None).unwrap().len(), 1);
    }

    #[test]
    fn test_deleted_record_still_in_feed() {
        let board = setup_board();
        board.upsert("AB12", "J. Doe", "in_theatre").unwrap();
        board.delete("AB12").unwrap();

        assert!(board.list().unwrap().is_empty());
        let feed = board.recent_updates(None).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].uhid, "AB12");
    }

    #[test]
    fn test_feed_bounded_and_newest_first() {
        let board = StatusBoard::in_memory(FeedConfig {
            retain: 3,
            default_limit: 10,
        })
        .unwrap();
        for i in 0..6 {
            board.upsert("AB12", &format!("Name {}", i), "waiting").unwrap();
        }

        let feed = board.recent_updates(None).unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].name, "Name 5");
        assert!(feed.windows(2).all(|w| w[0].recorded_at > w[1].recorded_at));
    }

    #[test]
    fn test_recent_updates_explicit_limit() {
        let board = setup_board();
        for i in 0..4 {
            board.upsert(&format!("A{}", i), "X", "waiting").unwrap();
        }

        assert_eq!(board.recent_updates(Some(2)).unwrap().len(), 2);
        assert_eq!(board.recent_updates(Some(0)).unwrap().len(), 0);
    }

    #[test]
    fn test_stage_accepts_label_form() {
        let board = setup_board();
        let record = board.upsert("AB12", "J. Doe", "In Theatre").unwrap();
        assert_eq!(record.stage, OtStage::InTheatre);
    }
}
