use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Unit mappings
// ---------------------------------------------------------------------------

/// Correspondence between internal unit names and the registry's unit
/// naming. One internal unit may cover several external labels; an external
/// label belongs to at most one internal unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMappings {
    map: BTreeMap<String, Vec<String>>,
}

impl UnitMappings {
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Internal unit names with at least one confirmed external label.
    pub fn internal_units(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// External labels confirmed for an internal unit, in confirmation
    /// order.
    pub fn externals_for(&self, internal: &str) -> &[String] {
        self.map.get(internal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reverse lookup: the internal unit an external label was confirmed
    /// into, if any.
    pub fn internal_for(&self, external_label: &str) -> Option<&str> {
        self.map
            .iter()
            .find(|(_, externals)| externals.iter().any(|e| e == external_label))
            .map(|(internal, _)| internal.as_str())
    }

    /// Merge operator confirmations. A label confirmed again moves to its
    /// new internal unit.
    pub fn confirm<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (external, internal) in pairs {
            for externals in self.map.values_mut() {
                externals.retain(|e| e != &external);
            }
            self.map.entry(internal).or_default().push(external);
        }
        self.map.retain(|_, externals| !externals.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Reconciled units
// ---------------------------------------------------------------------------

/// Internal units whose reconciliation pass is finished. Append-only;
/// reconciled units are excluded from future by-unit candidate listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledUnits {
    units: Vec<String>,
}

impl ReconciledUnits {
    pub fn contains(&self, unit: &str) -> bool {
        self.units.iter().any(|u| u == unit)
    }

    /// Append a unit. Returns false when it was already marked.
    pub fn mark(&mut self, unit: impl Into<String>) -> bool {
        let unit = unit.into();
        if self.contains(&unit) {
            return false;
        }
        self.units.push(unit);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_builds_forward_mapping() {
        let mut mappings = UnitMappings::default();
        mappings.confirm([
            ("BIBLIOTECA CENTRAL".to_string(), "Biblioteca".to_string()),
            ("BIBLIOTECA SETORIAL".to_string(), "Biblioteca".to_string()),
        ]);
        assert_eq!(
            mappings.externals_for("Biblioteca"),
            &["BIBLIOTECA CENTRAL".to_string(), "BIBLIOTECA SETORIAL".to_string()]
        );
        assert_eq!(mappings.internal_for("BIBLIOTECA SETORIAL"), Some("Biblioteca"));
        assert_eq!(mappings.internal_for("ALMOXARIFADO"), None);
    }

    #[test]
    fn reconfirming_moves_the_label() {
        let mut mappings = UnitMappings::default();
        mappings.confirm([("LAB QUIMICA".to_string(), "Quimica".to_string())]);
        mappings.confirm([("LAB QUIMICA".to_string(), "Laboratorios".to_string())]);

        assert_eq!(mappings.internal_for("LAB QUIMICA"), Some("Laboratorios"));
        assert!(mappings.externals_for("Quimica").is_empty());
        // The emptied entry is dropped entirely.
        assert_eq!(mappings.internal_units().count(), 1);
    }

    #[test]
    fn reconciled_units_are_append_only() {
        let mut done = ReconciledUnits::default();
        assert!(done.mark("Almoxarifado"));
        assert!(!done.mark("Almoxarifado"));
        assert!(done.contains("Almoxarifado"));
        assert_eq!(done.len(), 1);
    }
}
