//! Description similarity scoring.
//!
//! Inputs are pre-normalized (see [`crate::text::normalize`]): trimmed,
//! case-folded, diacritics stripped. Scores are in `[0.0, 1.0]`,
//! deterministic, and symmetric.

use std::collections::BTreeSet;

const CONTAINMENT_SCORE: f64 = 0.92;
const WORD_WEIGHT: f64 = 0.6;
const SUBSTRING_WEIGHT: f64 = 0.3;
const EDIT_WEIGHT: f64 = 0.2;
/// Words shorter than this are noise for the word-overlap term.
const MIN_WORD_LEN: usize = 3;
const SUBSTRING_MAX: usize = 8;
const SUBSTRING_MIN: usize = 4;
/// Edit distance is only computed when both strings are shorter than this.
const EDIT_MAX_LEN: usize = 50;
/// Length gap beyond which the edit distance is approximated as `max_len`.
const EDIT_LEN_GAP: usize = 20;

/// Similarity of two normalized descriptions.
///
/// Equal strings score 1.0 and containment scores 0.92; otherwise the score
/// is a capped weighted sum of word overlap, a shared-substring bonus, and a
/// length-bounded edit-distance term.
pub fn score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(b) || b.contains(a) {
        return CONTAINMENT_SCORE;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);

    let mut total = WORD_WEIGHT * word_jaccard(a, b);
    total += substring_bonus(a, b, max_len);

    if a_len < EDIT_MAX_LEN && b_len < EDIT_MAX_LEN {
        let distance = if a_len.abs_diff(b_len) > EDIT_LEN_GAP {
            max_len
        } else {
            strsim::levenshtein(a, b)
        };
        total += EDIT_WEIGHT * (1.0 - distance as f64 / max_len as f64);
    }

    total.min(1.0)
}

/// Words that count toward the overlap term.
fn word_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .collect()
}

/// Jaccard index over the word sets, ignoring words of fewer than three
/// characters.
fn word_jaccard(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

/// Bonus for the longest shared character run of length 4..=8, largest
/// first, scaled by how much of the longer string it covers.
fn substring_bonus(a: &str, b: &str, max_len: usize) -> f64 {
    let chars: Vec<char> = a.chars().collect();
    for size in (SUBSTRING_MIN..=SUBSTRING_MAX).rev() {
        if chars.len() < size {
            continue;
        }
        for window in chars.windows(size) {
            let needle: String = window.iter().collect();
            if b.contains(&needle) {
                return SUBSTRING_WEIGHT * size as f64 / max_len as f64;
            }
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text;

    #[test]
    fn equal_after_normalization() {
        let a = text::normalize("Cadeira de escritorio");
        let b = text::normalize("cadeira de escritório");
        assert_eq!(score(&a, &b), 1.0);
    }

    #[test]
    fn containment_scores_fixed() {
        assert_eq!(score("cadeira giratoria", "cadeira"), CONTAINMENT_SCORE);
        assert_eq!(score("mesa", "mesa de madeira"), CONTAINMENT_SCORE);
    }

    #[test]
    fn unrelated_descriptions_stay_low() {
        let a = text::normalize("Mesa de reuniao grande");
        let b = text::normalize("Mesa pequena");
        assert!(score(&a, &b) < 0.5);
    }

    #[test]
    fn empty_against_non_empty_is_zero() {
        assert_eq!(score("", "cadeira"), 0.0);
        assert_eq!(score("cadeira", ""), 0.0);
        assert_eq!(score("", ""), 1.0);
    }

    #[test]
    fn symmetric() {
        let a = "armario de aco duas portas";
        let b = "armario madeira";
        assert_eq!(score(a, b), score(b, a));
    }

    #[test]
    fn bounded_to_unit_interval() {
        let pairs = [
            ("cadeira fixa", "cadeira giratoria"),
            ("projetor multimidia", "projetor"),
            ("ventilador de teto", "bebedouro coluna"),
        ];
        for (a, b) in pairs {
            let s = score(a, b);
            assert!((0.0..=1.0).contains(&s), "score({a}, {b}) = {s}");
        }
    }

    #[test]
    fn large_length_gap_approximates_distance() {
        // 30 vs 4 chars: gap over 20, edit term collapses to zero but the
        // other terms still apply.
        let a = "impressora multifuncional laser";
        let b = "fax";
        let s = score(a, b);
        assert!(s < 0.1, "got {s}");
    }

    #[test]
    fn long_strings_skip_edit_distance() {
        let a = "mesa retangular de madeira maciça para sala de reunioes com oito lugares";
        let b = "mesa retangular de madeira maciça para sala de reunioes com dez lugares";
        // Still scores through word overlap + substring bonus alone.
        let s = score(a, b);
        assert!(s > 0.45 && s < CONTAINMENT_SCORE, "got {s}");
    }

    #[test]
    fn word_overlap_ignores_short_words() {
        // "de" must not count toward the overlap.
        let s = word_jaccard("mesa de centro", "cadeira de balanco");
        assert_eq!(s, 0.0);
    }
}
