//! Tag sentinel handling.
//!
//! The inventory stores the empty string or a small family of "no tag"
//! markers where an asset carries no physical identifier. Sentinels are
//! never real tags: they are not counted as used and never participate in
//! exact-tag matching.

use crate::text;

const SENTINELS: &[&str] = &["no tag", "notag", "sem tag", "sem etiqueta"];

/// Canonical form of a tag for comparison and set membership.
pub fn normalize(raw: &str) -> String {
    text::normalize(raw)
}

/// True when the value does not denote a real tag.
pub fn is_untagged(raw: &str) -> bool {
    let norm = text::normalize(raw);
    norm.is_empty() || SENTINELS.contains(&norm.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_untagged() {
        assert!(is_untagged(""));
        assert!(is_untagged("   "));
    }

    #[test]
    fn sentinel_family_is_untagged() {
        assert!(is_untagged("no tag"));
        assert!(is_untagged("NO TAG"));
        assert!(is_untagged("Sem Etiqueta"));
    }

    #[test]
    fn real_tags_are_not() {
        assert!(!is_untagged("2019003412"));
        assert!(!is_untagged("PAT-0042"));
    }

    #[test]
    fn normalization_is_shared_with_text() {
        assert_eq!(normalize(" PAT-0042 "), "pat-0042");
    }
}
