//! Interactive single-unit reconciliation session.
//!
//! An explicit value passed to and returned from each transition: no shared
//! globals, deterministic test-isolated instances. At most one pairing is
//! in flight at a time; links stage here until `commit` converts them into
//! one atomic store batch.

use assetlink_core::{tag, Condition, ExternalRecord, InternalRecord, ReconciledUnits};

use crate::error::ReconError;
use crate::store::{InventoryStore, NewRecord, RecordUpdate};

// ---------------------------------------------------------------------------
// Staged state
// ---------------------------------------------------------------------------

/// A staged, not-yet-committed pairing between an internal and an external
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLink {
    pub internal: InternalRecord,
    pub external: ExternalRecord,
    /// Adopt the registry description on commit instead of keeping the
    /// internal one.
    pub use_external_description: bool,
}

/// Current pairing position of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Pairing {
    #[default]
    Idle,
    InternalSelected(InternalRecord),
    AwaitingDescriptionChoice {
        internal: InternalRecord,
        external: ExternalRecord,
    },
}

/// Values the operator chooses when importing registry records directly.
#[derive(Debug, Clone, Default)]
pub struct ImportScope {
    pub unit: String,
    pub asset_type: String,
    pub condition: Condition,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ReconSession {
    pairing: Pairing,
    pending: Vec<PendingLink>,
    import_selection: Vec<ExternalRecord>,
    committed: bool,
}

impl ReconSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairing(&self) -> &Pairing {
        &self.pairing
    }

    pub fn pending_links(&self) -> &[PendingLink] {
        &self.pending
    }

    pub fn import_selection(&self) -> &[ExternalRecord] {
        &self.import_selection
    }

    fn is_staged_internal(&self, item: &InternalRecord) -> bool {
        self.pending.iter().any(|link| link.internal.id == item.id)
    }

    fn is_staged_external(&self, item: &ExternalRecord) -> bool {
        let wanted = tag::normalize(&item.tag);
        self.pending
            .iter()
            .any(|link| tag::normalize(&link.external.tag) == wanted)
    }

    /// Select the internal record to pair next. No-op when the record is
    /// already part of a pending link; otherwise clears the import
    /// selection and any external selection.
    pub fn select_internal(&mut self, item: InternalRecord) {
        if self.is_staged_internal(&item) {
            return;
        }
        self.import_selection.clear();
        self.pairing = Pairing::InternalSelected(item);
    }

    /// Select an external record. With an internal record selected this
    /// advances to the description choice; from idle it toggles the record
    /// in the direct-import selection when the workflow context permits
    /// imports. A record whose tag is already staged is never selectable.
    pub fn select_external(&mut self, item: ExternalRecord, allow_direct_import: bool) {
        if self.is_staged_external(&item) {
            return;
        }
        match std::mem::take(&mut self.pairing) {
            Pairing::InternalSelected(internal) => {
                self.pairing = Pairing::AwaitingDescriptionChoice {
                    internal,
                    external: item,
                };
            }
            Pairing::Idle => {
                if allow_direct_import {
                    let wanted = tag::normalize(&item.tag);
                    match self
                        .import_selection
                        .iter()
                        .position(|e| tag::normalize(&e.tag) == wanted)
                    {
                        Some(pos) => {
                            self.import_selection.remove(pos);
                        }
                        None => self.import_selection.push(item),
                    }
                }
            }
            state @ Pairing::AwaitingDescriptionChoice { .. } => {
                // A pairing already awaits its description choice.
                self.pairing = state;
            }
        }
    }

    /// Stage the in-flight pairing as a pending link and return to idle.
    pub fn confirm_pairing(&mut self, use_external_description: bool) -> Result<(), ReconError> {
        match std::mem::take(&mut self.pairing) {
            Pairing::AwaitingDescriptionChoice { internal, external } => {
                self.pending.push(PendingLink {
                    internal,
                    external,
                    use_external_description,
                });
                Ok(())
            }
            state => {
                self.pairing = state;
                Err(ReconError::Validation(
                    "confirming a pairing requires both an internal and an external selection"
                        .into(),
                ))
            }
        }
    }

    /// Discard the in-flight pairing and return to idle.
    pub fn cancel_pairing(&mut self) {
        self.pairing = Pairing::Idle;
    }

    /// Drop a staged link; both of its records become selectable again.
    pub fn remove_link(&mut self, index: usize) -> Option<PendingLink> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// Convert every staged link into a field-level update and apply them
    /// as one atomic batch. An empty staged set is a successful no-op. On
    /// store failure the staged links are left exactly as they were and the
    /// error is retryable.
    pub fn commit(&mut self, store: &mut dyn InventoryStore) -> Result<usize, ReconError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let batch: Vec<RecordUpdate> = self.pending.iter().map(link_update).collect();
        match store.apply_updates(&batch) {
            Ok(()) => {
                log::debug!("committed {} staged link(s)", batch.len());
                self.pending.clear();
                self.committed = true;
                Ok(batch.len())
            }
            Err(err) => {
                log::warn!("link commit failed, staged links kept: {err}");
                Err(ReconError::Store(err))
            }
        }
    }

    /// Mark a unit's reconciliation pass as finished. Only meaningful after
    /// a successful commit in this session; returns whether the set grew.
    pub fn finish_unit(&mut self, name: &str, reconciled: &mut ReconciledUnits) -> bool {
        if !self.committed {
            return false;
        }
        reconciled.mark(name)
    }

    /// Create an internal record for every selected registry record, as one
    /// batch. The selection clears on success and is kept on failure.
    pub fn direct_import(
        &mut self,
        store: &mut dyn InventoryStore,
        scope: &ImportScope,
    ) -> Result<usize, ReconError> {
        if self.import_selection.is_empty() {
            return Ok(0);
        }
        if !matches!(self.pairing, Pairing::Idle) {
            return Err(ReconError::Validation(
                "direct import is only available outside an active pairing".into(),
            ));
        }
        let batch: Vec<NewRecord> = self
            .import_selection
            .iter()
            .map(|external| NewRecord {
                tag: external.tag.clone(),
                description: external.description.clone(),
                asset_type: scope.asset_type.clone(),
                unit: scope.unit.clone(),
                condition: scope.condition,
                supplier: external.supplier.clone(),
                invoice: external.invoice.clone(),
                quantity: 1,
                needs_label: true,
                ..Default::default()
            })
            .collect();
        match store.create_records(&batch) {
            Ok(()) => {
                log::debug!("imported {} registry record(s)", batch.len());
                self.import_selection.clear();
                Ok(batch.len())
            }
            Err(err) => {
                log::warn!("direct import failed, selection kept: {err}");
                Err(ReconError::Store(err))
            }
        }
    }
}

fn link_update(link: &PendingLink) -> RecordUpdate {
    let mut update = RecordUpdate::new(link.internal.id.clone());
    update.tag = Some(link.external.tag.clone());
    if link.use_external_description {
        update.description = Some(link.external.description.clone());
    }
    update.supplier = Some(link.external.supplier.clone());
    update.invoice = Some(link.external.invoice.clone());
    update.needs_label = Some(true);
    update
}
