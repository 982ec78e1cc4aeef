//! Patient roster records.

use serde::{Deserialize, Serialize};

use super::stage::OtStage;

/// A single tracked patient, keyed by UHID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Unique hospital identifier, canonical uppercase form
    pub uhid: String,
    /// Patient display name
    pub name: String,
    /// Current OT journey stage
    pub stage: OtStage,
    /// Store-assigned write timestamp, milliseconds UTC
    pub last_updated: i64,
}

impl PatientRecord {
    /// Render-identity key.
    ///
    /// Changes on every successful upsert of this UHID, so a rendering layer
    /// can detect "content changed" even when the key fields look the same.
    pub fn render_key(&self) -> String {
        format!("{}-{}", self.uhid, self.last_updated)
    }
}
