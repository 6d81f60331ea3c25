//! Error types for the parameter model.

use std::fmt;

/// Misuse of the parameter model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Two parameter sets built from different descriptor lists.
    SchemaMismatch,
    /// Parameter index outside the descriptor list.
    IndexOutOfRange(usize),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch => write!(f, "parameter sets do not share a schema"),
            Self::IndexOutOfRange(index) => write!(f, "parameter index {index} out of range"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type for parameter model operations.
pub type CoreResult<T> = Result<T, CoreError>;
