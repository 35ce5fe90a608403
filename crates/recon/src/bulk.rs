//! Bulk import comparison: a pasted multi-unit sheet against the internal
//! inventory.
//!
//! Stage A resolves raw unit labels to internal units; Stage B matches the
//! surviving rows per unit over a private pool copy. Rows without a real
//! tag, or whose unit label the operator left unmapped, are silently
//! excluded: that is policy, not an error.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use assetlink_core::{tag, text, Condition, InternalRecord, RecordId, UnitMappings};

use crate::error::ReconError;
use crate::matcher::{self, CandidateRow, MatchReason};
use crate::paste::PastedRow;
use crate::store::{InventoryStore, NewRecord, RecordUpdate};
use crate::tolerance::ReconTolerance;
use crate::units;

// ---------------------------------------------------------------------------
// Stage A: unit resolution
// ---------------------------------------------------------------------------

/// One distinct raw unit label from the pasted sheet with its suggestion,
/// awaiting operator confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitResolution {
    pub label: String,
    pub row_count: usize,
    pub suggestion: Option<String>,
}

/// Group rows by raw unit label and suggest an internal unit for each: an
/// already-confirmed mapping wins, otherwise the similarity scorer proposes
/// the best-scoring known unit.
pub fn resolve_units(
    rows: &[PastedRow],
    known_units: &[String],
    mappings: &UnitMappings,
    tolerance: &ReconTolerance,
) -> Vec<UnitResolution> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        let label = row.unit.trim();
        if label.is_empty() {
            continue;
        }
        if !counts.contains_key(label) {
            order.push(label.to_string());
        }
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    order
        .into_iter()
        .map(|label| {
            let suggestion = mappings
                .internal_for(&label)
                .map(str::to_string)
                .or_else(|| units::suggest(&label, known_units, tolerance));
            UnitResolution {
                row_count: counts[&label],
                suggestion,
                label,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stage B: row resolution
// ---------------------------------------------------------------------------

/// Decision for one surviving row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Update,
    Create,
    Ignore,
}

/// One surviving pasted row with its match outcome and decided action.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub row: PastedRow,
    pub resolved_unit: String,
    pub matched: Option<RecordId>,
    pub score: f64,
    pub reason: MatchReason,
    pub action: RowAction,
    /// Set when the operator force-linked this row; forces description
    /// adoption on update.
    pub overridden: bool,
}

/// Stage B output plus the silent-exclusion counters.
#[derive(Debug, Default)]
pub struct BulkComparison {
    pub rows: Vec<ComparisonRow>,
    pub excluded_untagged: usize,
    pub excluded_unmapped: usize,
}

/// Field-update toggles chosen once per bulk run, applied uniformly to
/// every `Update` row. `Create` rows always populate every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldToggles {
    pub tag: bool,
    pub description: bool,
    pub location: bool,
    pub condition: bool,
    pub note: bool,
}

impl Default for FieldToggles {
    fn default() -> Self {
        Self {
            tag: true,
            description: true,
            location: true,
            condition: true,
            note: true,
        }
    }
}

/// Stage B: drop tagless and unmapped rows, then match per resolved unit
/// over a private pool copy, removing each matched record so no two rows
/// claim the same identity.
pub fn compare(
    rows: &[PastedRow],
    confirmed: &BTreeMap<String, String>,
    internals: &[InternalRecord],
    tolerance: &ReconTolerance,
) -> BulkComparison {
    let mut out = BulkComparison::default();

    // Surviving rows grouped by resolved unit, keeping paste order within
    // each group.
    let mut groups: Vec<(String, Vec<&PastedRow>)> = Vec::new();
    for row in rows {
        if tag::is_untagged(&row.tag) {
            out.excluded_untagged += 1;
            continue;
        }
        let Some(unit) = confirmed.get(row.unit.trim()) else {
            out.excluded_unmapped += 1;
            continue;
        };
        match groups.iter_mut().find(|(u, _)| u == unit) {
            Some((_, unit_rows)) => unit_rows.push(row),
            None => groups.push((unit.clone(), vec![row])),
        }
    }
    if out.excluded_untagged > 0 || out.excluded_unmapped > 0 {
        log::debug!(
            "bulk compare: {} untagged and {} unmapped row(s) excluded",
            out.excluded_untagged,
            out.excluded_unmapped
        );
    }

    for (unit, unit_rows) in groups {
        let unit_key = text::normalize(&unit);
        let mut pool: Vec<InternalRecord> = internals
            .iter()
            .filter(|r| !r.exchange && text::normalize(&r.unit) == unit_key)
            .cloned()
            .collect();
        for row in unit_rows {
            let candidate = CandidateRow {
                tag: row.tag.clone(),
                description: row.description.clone(),
                location: row.location.clone(),
                condition: Condition::parse(&row.condition),
            };
            let outcome = matcher::resolve(&candidate, &pool, tolerance);
            if let Some(ref id) = outcome.matched {
                pool.retain(|r| &r.id != id);
            }
            let action = if outcome.matched.is_some() {
                RowAction::Update
            } else {
                RowAction::Create
            };
            out.rows.push(ComparisonRow {
                row: row.clone(),
                resolved_unit: unit.clone(),
                matched: outcome.matched,
                score: outcome.score,
                reason: outcome.reason,
                action,
                overridden: false,
            });
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Decisions + apply
// ---------------------------------------------------------------------------

/// Counts for the operator-facing recap of a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkSummary {
    pub total_rows: usize,
    pub exact: usize,
    pub rigid: usize,
    pub manual: usize,
    pub unmatched: usize,
    pub updates: usize,
    pub creates: usize,
    pub ignored: usize,
    pub excluded_untagged: usize,
    pub excluded_unmapped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkApplied {
    pub updated: usize,
    pub created: usize,
}

impl BulkComparison {
    /// Untagged candidates an unmatched row may be force-linked to,
    /// narrowed to same-location candidates when any exist.
    pub fn override_candidates<'a>(
        &self,
        index: usize,
        internals: &'a [InternalRecord],
    ) -> Vec<&'a InternalRecord> {
        let Some(cmp) = self.rows.get(index) else {
            return Vec::new();
        };
        let unit_key = text::normalize(&cmp.resolved_unit);
        let claimed: BTreeSet<&RecordId> =
            self.rows.iter().filter_map(|r| r.matched.as_ref()).collect();
        let candidates: Vec<&InternalRecord> = internals
            .iter()
            .filter(|r| !r.exchange && r.is_untagged() && text::normalize(&r.unit) == unit_key)
            .filter(|r| !claimed.contains(&r.id))
            .collect();

        let location_key = text::normalize(&cmp.row.location);
        let same_location: Vec<&InternalRecord> = candidates
            .iter()
            .copied()
            .filter(|r| r.location_key() == location_key)
            .collect();
        if same_location.is_empty() {
            candidates
        } else {
            same_location
        }
    }

    /// Force-link a row to an untagged candidate of its unit. Sets score
    /// 1.0 and forces description adoption regardless of the toggles.
    pub fn force_link(&mut self, index: usize, target: &InternalRecord) -> Result<(), ReconError> {
        if !target.is_untagged() {
            return Err(ReconError::Validation(format!(
                "record {} already carries a tag",
                target.id
            )));
        }
        let claimed_elsewhere = self
            .rows
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.matched.as_ref() == Some(&target.id));
        if claimed_elsewhere {
            return Err(ReconError::Validation(format!(
                "record {} is already linked to another row",
                target.id
            )));
        }
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| ReconError::Validation(format!("no comparison row {index}")))?;
        row.matched = Some(target.id.clone());
        row.score = 1.0;
        row.reason = MatchReason::Manual;
        row.action = RowAction::Update;
        row.overridden = true;
        Ok(())
    }

    pub fn set_action(&mut self, index: usize, action: RowAction) {
        if let Some(row) = self.rows.get_mut(index) {
            row.action = action;
        }
    }

    /// Updates for every `Update` row, honoring the toggles. An overridden
    /// row adopts the pasted description regardless.
    pub fn updates(&self, toggles: &FieldToggles) -> Vec<RecordUpdate> {
        self.rows
            .iter()
            .filter(|r| r.action == RowAction::Update)
            .filter_map(|r| {
                let id = r.matched.clone()?;
                let mut update = RecordUpdate::new(id);
                if toggles.tag {
                    update.tag = Some(r.row.tag.clone());
                }
                if toggles.description || r.overridden {
                    update.description = Some(r.row.description.clone());
                }
                if toggles.location {
                    update.location = Some(r.row.location.clone());
                }
                if toggles.condition {
                    update.condition = Some(Condition::parse(&r.row.condition));
                }
                if toggles.note {
                    update.note = Some(r.row.note.clone());
                }
                Some(update)
            })
            .collect()
    }

    /// New records for every `Create` row; toggles do not apply.
    pub fn creations(&self) -> Vec<NewRecord> {
        self.rows
            .iter()
            .filter(|r| r.action == RowAction::Create)
            .map(|r| NewRecord {
                tag: r.row.tag.clone(),
                description: r.row.description.clone(),
                asset_type: r.row.asset_type.clone(),
                unit: r.resolved_unit.clone(),
                location: r.row.location.clone(),
                condition: Condition::parse(&r.row.condition),
                supplier: r.row.supplier.clone(),
                invoice: r.row.invoice.clone(),
                donation_origin: r.row.origin.clone(),
                quantity: r.row.quantity,
                note: r.row.note.clone(),
                needs_label: true,
            })
            .collect()
    }

    /// Apply the decided rows: one update batch, then one creation batch.
    /// Each batch is atomic on its own.
    pub fn apply(
        &self,
        store: &mut dyn InventoryStore,
        toggles: &FieldToggles,
    ) -> Result<BulkApplied, ReconError> {
        let updates = self.updates(toggles);
        let creations = self.creations();
        if !updates.is_empty() {
            store.apply_updates(&updates)?;
        }
        if !creations.is_empty() {
            store.create_records(&creations)?;
        }
        log::debug!(
            "bulk apply: {} update(s), {} creation(s)",
            updates.len(),
            creations.len()
        );
        Ok(BulkApplied {
            updated: updates.len(),
            created: creations.len(),
        })
    }

    pub fn summary(&self) -> BulkSummary {
        let mut summary = BulkSummary {
            total_rows: self.rows.len(),
            exact: 0,
            rigid: 0,
            manual: 0,
            unmatched: 0,
            updates: 0,
            creates: 0,
            ignored: 0,
            excluded_untagged: self.excluded_untagged,
            excluded_unmapped: self.excluded_unmapped,
        };
        for row in &self.rows {
            match row.reason {
                MatchReason::ExactTag => summary.exact += 1,
                MatchReason::Rigid => summary.rigid += 1,
                MatchReason::Manual => summary.manual += 1,
                MatchReason::Unmatched => summary.unmatched += 1,
            }
            match row.action {
                RowAction::Update => summary.updates += 1,
                RowAction::Create => summary.creates += 1,
                RowAction::Ignore => summary.ignored += 1,
            }
        }
        summary
    }
}
