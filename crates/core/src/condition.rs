use serde::{Deserialize, Serialize};

use crate::text;

/// Physical state of an asset. Closed set; free-text labels from feeds and
/// pasted sheets are classified through [`Condition::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Good,
    #[default]
    Regular,
    Damaged,
}

/// Label stems that classify as damaged, in any position.
const DAMAGED_STEMS: &[&str] = &[
    "damaged",
    "broken",
    "defective",
    "bad",
    "danificad",
    "quebrad",
    "defeituos",
    "ruim",
    "pessim",
    "inserv",
];

impl Condition {
    /// Classify a free-text condition label.
    ///
    /// Any parenthetical suffix is dropped before classifying, so labels
    /// like `"Bom (verificar pé)"` read as their head. Total: empty or
    /// unrecognized input degrades to `Regular`.
    pub fn parse(label: &str) -> Self {
        let head = label.split('(').next().unwrap_or("");
        let norm = text::normalize(head);
        if norm.is_empty() {
            return Self::Regular;
        }
        if DAMAGED_STEMS.iter().any(|stem| norm.contains(stem)) {
            return Self::Damaged;
        }
        if norm.starts_with("new") || norm.starts_with("nov") {
            return Self::New;
        }
        if norm.starts_with("good")
            || norm.starts_with("excellent")
            || norm.starts_with("excelente")
            || norm.starts_with("bom")
            || norm.starts_with("boa")
            || norm.starts_with("otim")
        {
            return Self::Good;
        }
        Self::Regular
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Good => write!(f, "good"),
            Self::Regular => write!(f, "regular"),
            Self::Damaged => write!(f, "damaged"),
        }
    }
}
