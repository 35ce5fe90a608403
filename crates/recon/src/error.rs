use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ReconError {
    /// An operation was invoked without its required selections.
    Validation(String),
    /// TOML parse / deserialization error for the tolerance config.
    ToleranceParse(String),
    /// Tolerance gate out of range or misordered.
    ToleranceValidation(String),
    /// Required column absent from pasted text.
    MissingColumn { column: String },
    /// Pasted text could not be read.
    Paste(String),
    /// The inventory store rejected a batch. Staged state is unchanged and
    /// the operation can be retried as-is.
    Store(StoreError),
}

impl ReconError {
    /// True for failures that leave staged state intact and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::ToleranceParse(msg) => write!(f, "tolerance parse error: {msg}"),
            Self::ToleranceValidation(msg) => write!(f, "tolerance validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::Paste(msg) => write!(f, "pasted text error: {msg}"),
            Self::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl From<StoreError> for ReconError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl std::error::Error for ReconError {}
