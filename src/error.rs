//! Error types for the mapping engine

use thiserror::Error;

/// Errors surfaced by the mapping engine.
///
/// Only directive resolution can fail, and only under the strict policy.
/// Coercion failures and short rows are not errors; they degrade to
/// leaving the affected field at its default value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// A directive's index segment is not a valid non-negative base-10
    /// integer.
    #[error("invalid column index `{raw}` in directive for field `{field}`")]
    InvalidIndex { field: String, raw: String },
}
