//! OT journey stage vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A patient's stage in the operating theatre journey.
///
/// The variant order is the canonical display order for selection controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OtStage {
    /// Admitted, waiting to be taken in
    Waiting,
    /// Pre-operative preparation
    PreOp,
    /// Surgery in progress
    InTheatre,
    /// Post-operative recovery
    Recovery,
    /// Discharged from the OT workflow
    Discharged,
}

/// Error for strings outside the stage vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown OT stage: {0}")]
pub struct UnknownStage(pub String);

impl OtStage {
    /// All stages in canonical display order.
    pub const ALL: [OtStage; 5] = [
        OtStage::Waiting,
        OtStage::PreOp,
        OtStage::InTheatre,
        OtStage::Recovery,
        OtStage::Discharged,
    ];

    /// Stable storage token for this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            OtStage::Waiting => "waiting",
            OtStage::PreOp => "pre_op",
            OtStage::InTheatre => "in_theatre",
            OtStage::Recovery => "recovery",
            OtStage::Discharged => "discharged",
        }
    }

    /// Public board label for this stage.
    pub fn label(&self) -> &'static str {
        match self {
            OtStage::Waiting => "Waiting",
            OtStage::PreOp => "Pre-Op",
            OtStage::InTheatre => "In Theatre",
            OtStage::Recovery => "In Recovery",
            OtStage::Discharged => "Discharged",
        }
    }
}

impl fmt::Display for OtStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OtStage {
    type Err = UnknownStage;

    /// Parse either the storage token or the board label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OtStage::ALL
            .iter()
            .copied()
            .find(|stage| wanted == stage.as_str() || wanted == stage.label().to_lowercase())
            .ok_or_else(|| UnknownStage(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_and_label() {
        assert_eq!("waiting".parse::<OtStage>().unwrap(), OtStage::Waiting);
        assert_eq!("In Theatre".parse::<OtStage>().unwrap(), OtStage::InTheatre);
        assert_eq!("PRE_OP".parse::<OtStage>().unwrap(), OtStage::PreOp);
        assert!("in surgery".parse::<OtStage>().is_err());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(OtStage::Recovery.to_string(), "In Recovery");
    }

    #[test]
    fn test_serde_uses_token() {
        let json = serde_json::to_string(&OtStage::InTheatre).unwrap();
        assert_eq!(json, r#""in_theatre""#);
        let back: OtStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OtStage::InTheatre);
    }

    #[test]
    fn test_all_order_is_display_order() {
        let labels: Vec<&str> = OtStage::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["Waiting", "Pre-Op", "In Theatre", "In Recovery", "Discharged"]
        );
    }
}
