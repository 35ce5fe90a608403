use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::tag;
use crate::text;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque identity of an internal inventory record (the document key in the
/// backing store).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Internal inventory
// ---------------------------------------------------------------------------

/// One internally-managed inventory record. Owned by the inventory
/// collection; mutated by operator edits, bulk imports and link commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalRecord {
    pub id: RecordId,
    /// Physical asset tag; empty or a "no tag" marker means untagged.
    pub tag: String,
    pub description: String,
    pub asset_type: String,
    pub unit: String,
    pub location: String,
    pub condition: Condition,
    pub supplier: String,
    pub invoice: String,
    /// Free-text origin for donated assets.
    pub donation_origin: String,
    pub quantity: u32,
    pub note: String,
    /// A physical tag still needs to be printed and applied.
    pub needs_label: bool,
    /// Flagged for exchange; excluded from all matching.
    pub exchange: bool,
}

impl InternalRecord {
    /// True when the record carries no real tag.
    pub fn is_untagged(&self) -> bool {
        tag::is_untagged(&self.tag)
    }

    /// Normalized location used for rigid comparison.
    pub fn location_key(&self) -> String {
        text::normalize(&self.location)
    }
}

// ---------------------------------------------------------------------------
// External registry
// ---------------------------------------------------------------------------

/// Lifecycle status of a registry record. Only `Available` records are
/// matchable or counted as leftovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalStatus {
    #[default]
    Available,
    InUse,
    WrittenOff,
}

impl ExternalStatus {
    /// Classify the feed's free-text status label. Unknown labels read as
    /// `InUse`: never matchable, never a leftover.
    pub fn parse(label: &str) -> Self {
        let norm = text::normalize(label);
        if norm.starts_with("avail") || norm.starts_with("ativ") || norm.starts_with("dispon") {
            Self::Available
        } else if norm.starts_with("baixad")
            || norm.starts_with("written")
            || norm.starts_with("descart")
        {
            Self::WrittenOff
        } else {
            Self::InUse
        }
    }
}

impl std::fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::InUse => write!(f, "in_use"),
            Self::WrittenOff => write!(f, "written_off"),
        }
    }
}

/// One record from the authoritative external registry. Read-only reference
/// data sourced from a periodically refreshed feed; never mutated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    pub tag: String,
    pub description: String,
    pub unit: String,
    pub status: ExternalStatus,
    pub supplier: String,
    pub invoice: String,
    pub entry_type: String,
    pub registered: Option<NaiveDate>,
}

impl ExternalRecord {
    pub fn has_real_tag(&self) -> bool {
        !tag::is_untagged(&self.tag)
    }

    pub fn is_available(&self) -> bool {
        self.status == ExternalStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_classify() {
        assert_eq!(ExternalStatus::parse("Ativo"), ExternalStatus::Available);
        assert_eq!(ExternalStatus::parse("available"), ExternalStatus::Available);
        assert_eq!(ExternalStatus::parse("Disponível"), ExternalStatus::Available);
        assert_eq!(ExternalStatus::parse("Baixado"), ExternalStatus::WrittenOff);
        assert_eq!(ExternalStatus::parse("written off"), ExternalStatus::WrittenOff);
        assert_eq!(ExternalStatus::parse("em uso"), ExternalStatus::InUse);
        assert_eq!(ExternalStatus::parse("???"), ExternalStatus::InUse);
    }

    #[test]
    fn untagged_records() {
        let rec = InternalRecord {
            id: RecordId::new("r1"),
            tag: "No Tag".into(),
            ..Default::default()
        };
        assert!(rec.is_untagged());

        let rec = InternalRecord {
            id: RecordId::new("r2"),
            tag: "2019003412".into(),
            ..Default::default()
        };
        assert!(!rec.is_untagged());
    }

    #[test]
    fn location_key_normalizes() {
        let rec = InternalRecord {
            location: "  Sala 12,   Bloco B ".into(),
            ..Default::default()
        };
        assert_eq!(rec.location_key(), "sala 12, bloco b");
    }
}
