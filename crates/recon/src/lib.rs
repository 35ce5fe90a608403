//! `assetlink-recon` — Inventory ↔ registry reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns match decisions
//! and staged batches. No IO dependencies; persistence is a collaborator
//! trait implemented by the caller.

pub mod bulk;
pub mod error;
pub mod leftover;
pub mod matcher;
pub mod paste;
pub mod session;
pub mod store;
pub mod tolerance;
pub mod units;

pub use error::ReconError;
pub use matcher::{resolve, CandidateRow, MatchOutcome, MatchReason};
pub use session::{PendingLink, ReconSession};
pub use store::{InventoryStore, MemoryStore};
pub use tolerance::ReconTolerance;
