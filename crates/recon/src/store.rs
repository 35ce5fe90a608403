//! Persistence collaborator boundary.
//!
//! The engine never talks to a database: commits and imports produce
//! field-level batches that an [`InventoryStore`] implementation applies as
//! a single all-or-nothing write.

use std::fmt;

use serde::Serialize;

use assetlink_core::{Condition, InternalRecord, RecordId};

// ---------------------------------------------------------------------------
// Batch types
// ---------------------------------------------------------------------------

/// Field-level update to one internal record. `None` leaves the field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordUpdate {
    pub id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_label: Option<bool>,
}

impl RecordUpdate {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// True when no field would change.
    pub fn is_noop(&self) -> bool {
        self.tag.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.condition.is_none()
            && self.supplier.is_none()
            && self.invoice.is_none()
            && self.note.is_none()
            && self.needs_label.is_none()
    }
}

/// A record to be created; the store assigns its identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRecord {
    pub tag: String,
    pub description: String,
    pub asset_type: String,
    pub unit: String,
    pub location: String,
    pub condition: Condition,
    pub supplier: String,
    pub invoice: String,
    pub donation_origin: String,
    pub quantity: u32,
    pub note: String,
    pub needs_label: bool,
}

// ---------------------------------------------------------------------------
// Collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The batch was rejected as a whole; nothing was applied.
    Rejected(String),
    /// The store could not be reached.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "batch rejected: {msg}"),
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Applies update and creation batches atomically: a batch either fully
/// applies or fails with nothing written. Implementations decide transport
/// and identity assignment.
pub trait InventoryStore {
    fn apply_updates(&mut self, batch: &[RecordUpdate]) -> Result<(), StoreError>;
    fn create_records(&mut self, batch: &[NewRecord]) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory implementation backing tests and demos. Assigns sequential
/// identities to created records and can be armed to reject the next batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub records: Vec<InternalRecord>,
    next_id: usize,
    fail_next: Option<StoreError>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<InternalRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Arm the store to reject the next batch.
    pub fn fail_next(&mut self, err: StoreError) {
        self.fail_next = Some(err);
    }

    pub fn get(&self, id: &RecordId) -> Option<&InternalRecord> {
        self.records.iter().find(|r| &r.id == id)
    }
}

impl InventoryStore for MemoryStore {
    fn apply_updates(&mut self, batch: &[RecordUpdate]) -> Result<(), StoreError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        // Validate the whole batch before touching anything.
        for update in batch {
            if !self.records.iter().any(|r| r.id == update.id) {
                return Err(StoreError::Rejected(format!("unknown record {}", update.id)));
            }
        }
        for update in batch {
            if let Some(record) = self.records.iter_mut().find(|r| r.id == update.id) {
                if let Some(ref tag) = update.tag {
                    record.tag = tag.clone();
                }
                if let Some(ref description) = update.description {
                    record.description = description.clone();
                }
                if let Some(ref location) = update.location {
                    record.location = location.clone();
                }
                if let Some(condition) = update.condition {
                    record.condition = condition;
                }
                if let Some(ref supplier) = update.supplier {
                    record.supplier = supplier.clone();
                }
                if let Some(ref invoice) = update.invoice {
                    record.invoice = invoice.clone();
                }
                if let Some(ref note) = update.note {
                    record.note = note.clone();
                }
                if let Some(needs_label) = update.needs_label {
                    record.needs_label = needs_label;
                }
            }
        }
        Ok(())
    }

    fn create_records(&mut self, batch: &[NewRecord]) -> Result<(), StoreError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        for new in batch {
            self.next_id += 1;
            self.records.push(InternalRecord {
                id: RecordId::new(format!("mem_{}", self.next_id)),
                tag: new.tag.clone(),
                description: new.description.clone(),
                asset_type: new.asset_type.clone(),
                unit: new.unit.clone(),
                location: new.location.clone(),
                condition: new.condition,
                supplier: new.supplier.clone(),
                invoice: new.invoice.clone(),
                donation_origin: new.donation_origin.clone(),
                quantity: new.quantity,
                note: new.note.clone(),
                needs_label: new.needs_label,
                exchange: false,
            });
        }
        Ok(())
    }
}
