use serde::Serialize;

use assetlink_core::{score, tag, text, Condition, InternalRecord, RecordId};

use crate::tolerance::ReconTolerance;

// ---------------------------------------------------------------------------
// Input + outcome
// ---------------------------------------------------------------------------

/// One row to be matched against the internal pool, built from a pasted
/// sheet row or a registry record.
#[derive(Debug, Clone, Default)]
pub struct CandidateRow {
    pub tag: String,
    pub description: String,
    pub location: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ExactTag,
    Rigid,
    /// Operator force-link; never produced by [`resolve`].
    Manual,
    Unmatched,
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactTag => write!(f, "exact_tag"),
            Self::Rigid => write!(f, "rigid"),
            Self::Manual => write!(f, "manual"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Outcome of resolving one row.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub matched: Option<RecordId>,
    pub score: f64,
    pub reason: MatchReason,
}

impl MatchOutcome {
    fn unmatched() -> Self {
        Self {
            matched: None,
            score: 0.0,
            reason: MatchReason::Unmatched,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve one row against the pool.
///
/// Exact-tag matching scans the whole pool. When it fails, rigid matching
/// considers only untagged candidates in pool order and accepts the first
/// whose location and condition are equal and whose description similarity
/// clears the gate; it does not look for a better candidate further on.
/// Callers resolving a batch must remove a matched record from the pool
/// before the next row; see [`resolve_batch`].
pub fn resolve(
    row: &CandidateRow,
    pool: &[InternalRecord],
    tolerance: &ReconTolerance,
) -> MatchOutcome {
    if !tag::is_untagged(&row.tag) {
        let wanted = tag::normalize(&row.tag);
        for candidate in pool {
            if !candidate.is_untagged() && tag::normalize(&candidate.tag) == wanted {
                return MatchOutcome {
                    matched: Some(candidate.id.clone()),
                    score: 1.0,
                    reason: MatchReason::ExactTag,
                };
            }
        }
    }

    let row_location = text::normalize(&row.location);
    let row_description = text::normalize(&row.description);
    for candidate in pool {
        if !candidate.is_untagged() {
            continue;
        }
        if candidate.location_key() != row_location || candidate.condition != row.condition {
            continue;
        }
        let similarity = score(&row_description, &text::normalize(&candidate.description));
        if similarity > tolerance.rigid_accept {
            return MatchOutcome {
                matched: Some(candidate.id.clone()),
                score: tolerance.rigid_score,
                reason: MatchReason::Rigid,
            };
        }
    }

    MatchOutcome::unmatched()
}

/// Resolve rows sequentially over a private pool copy, removing each
/// matched record so no two rows claim the same identity.
pub fn resolve_batch(
    rows: &[CandidateRow],
    pool: &[InternalRecord],
    tolerance: &ReconTolerance,
) -> Vec<MatchOutcome> {
    let mut working: Vec<InternalRecord> = pool.to_vec();
    rows.iter()
        .map(|row| {
            let outcome = resolve(row, &working, tolerance);
            if let Some(ref id) = outcome.matched {
                working.retain(|r| &r.id != id);
            }
            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internal(id: &str, tag: &str, description: &str, location: &str, condition: Condition) -> InternalRecord {
        InternalRecord {
            id: RecordId::new(id),
            tag: tag.into(),
            description: description.into(),
            location: location.into(),
            condition,
            unit: "Almoxarifado".into(),
            ..Default::default()
        }
    }

    fn row(tag: &str, description: &str, location: &str, condition: Condition) -> CandidateRow {
        CandidateRow {
            tag: tag.into(),
            description: description.into(),
            location: location.into(),
            condition,
        }
    }

    #[test]
    fn exact_tag_dominates() {
        // Same tag, everything else disagrees: still an exact match, and
        // location/condition/similarity are never consulted.
        let pool = vec![internal(
            "r1",
            "2019003412",
            "ventilador de teto",
            "sala 1",
            Condition::Damaged,
        )];
        let outcome = resolve(
            &row("2019003412", "cadeira fixa", "sala 99", Condition::New),
            &pool,
            &ReconTolerance::default(),
        );
        assert_eq!(outcome.reason, MatchReason::ExactTag);
        assert_eq!(outcome.score, 1.0);
        assert_eq!(outcome.matched, Some(RecordId::new("r1")));
    }

    #[test]
    fn exact_tag_ignores_sentinels() {
        // A "no tag" row must not exact-match an untagged record.
        let pool = vec![internal("r1", "", "cadeira fixa", "sala 1", Condition::Good)];
        let outcome = resolve(
            &row("no tag", "qualquer coisa", "sala 2", Condition::New),
            &pool,
            &ReconTolerance::default(),
        );
        assert_eq!(outcome.reason, MatchReason::Unmatched);
    }

    #[test]
    fn rigid_requires_location_and_condition() {
        let tolerance = ReconTolerance::default();
        let base = internal("r1", "", "cadeira de escritorio", "sala 3", Condition::Good);

        let hit = resolve(
            &row("9000001", "Cadeira de escritório", "Sala 3", Condition::Good),
            &[base.clone()],
            &tolerance,
        );
        assert_eq!(hit.reason, MatchReason::Rigid);
        assert_eq!(hit.score, tolerance.rigid_score);

        // Changing only the location flips the classification.
        let mut moved = base.clone();
        moved.location = "sala 4".into();
        let miss = resolve(
            &row("9000001", "Cadeira de escritório", "Sala 3", Condition::Good),
            &[moved],
            &tolerance,
        );
        assert_eq!(miss.reason, MatchReason::Unmatched);

        // Changing only the condition does too.
        let mut worn = base;
        worn.condition = Condition::Regular;
        let miss = resolve(
            &row("9000001", "Cadeira de escritório", "Sala 3", Condition::Good),
            &[worn],
            &tolerance,
        );
        assert_eq!(miss.reason, MatchReason::Unmatched);
    }

    #[test]
    fn rigid_skips_tagged_candidates() {
        let pool = vec![internal(
            "r1",
            "2018000001",
            "cadeira de escritorio",
            "sala 3",
            Condition::Good,
        )];
        let outcome = resolve(
            &row("9000001", "cadeira de escritorio", "sala 3", Condition::Good),
            &pool,
            &ReconTolerance::default(),
        );
        assert_eq!(outcome.reason, MatchReason::Unmatched);
    }

    #[test]
    fn rigid_first_qualifying_wins() {
        // Two candidates qualify; pool order decides, not best score.
        let first = internal("r1", "", "cadeira de escritorio", "sala 3", Condition::Good);
        let second = internal(
            "r2",
            "",
            "cadeira de escritorio giratoria",
            "sala 3",
            Condition::Good,
        );
        let outcome = resolve(
            &row("9000001", "cadeira de escritorio", "Sala 3", Condition::Good),
            &[second, first],
            &ReconTolerance::default(),
        );
        // "cadeira de escritorio" is contained in the first candidate's
        // description (0.92 > 0.9), so the scan stops there.
        assert_eq!(outcome.matched, Some(RecordId::new("r2")));
    }

    #[test]
    fn batch_never_claims_a_record_twice() {
        let pool = vec![
            internal("r1", "", "mesa de madeira", "sala 1", Condition::Good),
            internal("r2", "", "mesa de madeira", "sala 1", Condition::Good),
        ];
        let rows = vec![
            row("9000001", "mesa de madeira", "sala 1", Condition::Good),
            row("9000002", "mesa de madeira", "sala 1", Condition::Good),
            row("9000003", "mesa de madeira", "sala 1", Condition::Good),
        ];
        let outcomes = resolve_batch(&rows, &pool, &ReconTolerance::default());
        assert_eq!(outcomes[0].matched, Some(RecordId::new("r1")));
        assert_eq!(outcomes[1].matched, Some(RecordId::new("r2")));
        assert_eq!(outcomes[2].reason, MatchReason::Unmatched);
    }
}
