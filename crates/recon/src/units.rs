//! Unit-name resolution between the inventory's naming and the registry's.

use std::collections::BTreeSet;

use assetlink_core::{score, text, ExternalRecord, InternalRecord, ReconciledUnits};

use crate::tolerance::ReconTolerance;

/// Best internal unit for an external unit label, if any candidate clears
/// the suggestion gate. Ties keep the earliest candidate. Pure function of
/// its inputs: identical label and candidate sets yield an identical
/// suggestion.
pub fn suggest(
    label: &str,
    known_units: &[String],
    tolerance: &ReconTolerance,
) -> Option<String> {
    let normalized = text::normalize(label);
    let mut best: Option<(usize, f64)> = None;
    for (idx, unit) in known_units.iter().enumerate() {
        let similarity = score(&normalized, &text::normalize(unit));
        let better = match best {
            Some((_, best_score)) => similarity > best_score,
            None => true,
        };
        if better {
            best = Some((idx, similarity));
        }
    }
    best.filter(|&(_, similarity)| similarity > tolerance.suggest_accept)
        .map(|(idx, _)| known_units[idx].clone())
}

/// Internal units still open for a by-unit reconciliation pass: every
/// distinct unit in the inventory not yet marked reconciled, in first
/// appearance order.
pub fn open_units(internals: &[InternalRecord], reconciled: &ReconciledUnits) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut units = Vec::new();
    for record in internals {
        let name = record.unit.trim();
        if name.is_empty() || reconciled.contains(name) {
            continue;
        }
        if seen.insert(text::normalize(name)) {
            units.push(name.to_string());
        }
    }
    units
}

/// External unit names offered when scoping a unit: every distinct name in
/// the feed plus the operator-curated extras, first occurrence wins.
pub fn external_unit_choices(feed: &[ExternalRecord], extras: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut choices = Vec::new();
    for unit in feed
        .iter()
        .map(|e| e.unit.as_str())
        .chain(extras.iter().map(String::as_str))
    {
        let key = text::normalize(unit);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        choices.push(unit.trim().to_string());
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetlink_core::RecordId;

    fn units(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn close_label_is_suggested() {
        let known = units(&["Biblioteca", "Almoxarifado", "Laboratório de Química"]);
        let got = suggest("BIBLIOTECA CENTRAL", &known, &ReconTolerance::default());
        assert_eq!(got, Some("Biblioteca".to_string()));
    }

    #[test]
    fn distant_label_forces_manual_choice() {
        let known = units(&["Biblioteca", "Almoxarifado"]);
        let got = suggest("GINÁSIO POLIESPORTIVO", &known, &ReconTolerance::default());
        assert_eq!(got, None);
    }

    #[test]
    fn suggestion_is_deterministic() {
        let known = units(&["Secretaria", "Secretaria Acadêmica"]);
        let tolerance = ReconTolerance::default();
        let first = suggest("SECRETARIA", &known, &tolerance);
        let second = suggest("SECRETARIA", &known, &tolerance);
        assert_eq!(first, second);
    }

    #[test]
    fn open_units_skip_reconciled() {
        let internals = vec![
            InternalRecord {
                id: RecordId::new("r1"),
                unit: "Biblioteca".into(),
                ..Default::default()
            },
            InternalRecord {
                id: RecordId::new("r2"),
                unit: "Almoxarifado".into(),
                ..Default::default()
            },
            InternalRecord {
                id: RecordId::new("r3"),
                unit: "biblioteca".into(),
                ..Default::default()
            },
        ];
        let mut reconciled = ReconciledUnits::default();
        reconciled.mark("Almoxarifado");

        let open = open_units(&internals, &reconciled);
        assert_eq!(open, vec!["Biblioteca".to_string()]);
    }

    #[test]
    fn choices_merge_feed_and_extras() {
        let feed = vec![
            ExternalRecord {
                unit: "BIBLIOTECA".into(),
                ..Default::default()
            },
            ExternalRecord {
                unit: "biblioteca".into(),
                ..Default::default()
            },
        ];
        let extras = units(&["REITORIA"]);
        let choices = external_unit_choices(&feed, &extras);
        assert_eq!(choices, vec!["BIBLIOTECA".to_string(), "REITORIA".to_string()]);
    }
}
