//! OT Status Board Core Library
//!
//! Single source of truth for patients moving through an operating theatre
//! workflow, shared by a staff input console and a public display board.
//!
//! # Architecture
//!
//! ```text
//! Staff console ──upsert/delete──▶ StatusBoard ──write-through──▶ SQLite
//!                                      │
//!                     ┌────────────────┴────────────────┐
//!                     │ list()                          │ recent_updates()
//!                     ▼                                 ▼
//!               Display board                    Recency ticker
//!               (poll on demand)                 (poll every 5s)
//! ```
//!
//! # Core Principle
//!
//! **No push channel.** The console writes; every read-only surface
//! re-polls on its own cancellable timer and owns its snapshot. Propagation
//! is eventual, with staleness bounded by one polling interval.
//!
//! # Modules
//!
//! - [`models`]: Domain types (OtStage, PatientRecord, ChangeEvent)
//! - [`db`]: SQLite persistence layer
//! - [`board`]: The shared record store and recency feed
//! - [`poll`]: Polling synchronizer (repeating tasks and snapshots)

pub mod board;
pub mod db;
pub mod models;
pub mod poll;

// Re-export commonly used types
pub use board::{BoardError, BoardResult, FeedConfig, StatusBoard, ValidationError};
pub use db::Database;
pub use models::{ChangeEvent, OtStage, PatientRecord};
pub use poll::{PollHandle, Snapshot};
