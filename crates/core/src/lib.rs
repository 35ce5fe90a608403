//! `assetlink-core` — Domain types and pure text primitives.
//!
//! Leaf crate: typed inventory and registry records, the closed condition
//! enum, tag-sentinel handling, and the description similarity scorer.
//! No IO dependencies.

pub mod condition;
pub mod mapping;
pub mod record;
pub mod score;
pub mod tag;
pub mod text;

pub use condition::Condition;
pub use mapping::{ReconciledUnits, UnitMappings};
pub use record::{ExternalRecord, ExternalStatus, InternalRecord, RecordId};
pub use score::score;
