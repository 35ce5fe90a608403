//! Free-text normalization shared by tag, location and description
//! comparisons.

use deunicode::deunicode;

/// Canonical comparison form: trimmed, transliterated to ASCII (diacritics
/// stripped, CJK romanized), lowercased, inner whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let latin = deunicode(text.trim());
    let lower = latin.to_lowercase();

    let mut out = String::with_capacity(lower.len());
    let mut pending_space = false;
    for ch in lower.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}
