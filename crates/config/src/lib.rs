//! Operator-state persistence.
//!
//! Unit mappings, the reconciled-units set, and the curated list of extra
//! external unit names live as JSON files under the platform config dir.

pub mod store;

pub use store::MappingStore;
