//! Change events feeding the recency ticker.

use serde::{Deserialize, Serialize};

use super::record::PatientRecord;
use super::stage::OtStage;

/// A snapshot of one roster write.
///
/// Events are history, not live state: a record deleted after the event was
/// captured stays visible here until the retention bound evicts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    /// Unique event id
    pub event_id: String,
    /// UHID at the time of the write
    pub uhid: String,
    /// Patient name at the time of the write
    pub name: String,
    /// Stage the patient moved to
    pub stage: OtStage,
    /// Store-assigned write timestamp, milliseconds UTC
    pub recorded_at: i64,
}

impl ChangeEvent {
    /// Capture an event for a just-written record.
    pub fn for_record(record: &PatientRecord) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            uhid: record.uhid.clone(),
            name: record.name.clone(),
            stage: record.stage,
            recorded_at: record.last_updated,
        }
    }

    /// Ticker line for the public display.
    pub fn headline(&self) -> String {
        format!("[{}] {} updated to {}", self.uhid, self.name, self.stage)
    }
}
