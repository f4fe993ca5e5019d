//! Row mapping error types

use thiserror::Error;

/// Errors raised while turning relational rows into domain objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A row is missing a related row its owning chain requires
    /// (e.g. a result with no processing level, an action with no method)
    #[error("Incomplete {entity} record {id}: missing {missing}")]
    IncompleteRecord {
        entity: &'static str,
        id: i64,
        missing: &'static str,
    },
}

impl MappingError {
    pub fn incomplete(entity: &'static str, id: i64, missing: &'static str) -> Self {
        MappingError::IncompleteRecord {
            entity,
            id,
            missing,
        }
    }
}

/// Result type for row mapping
pub type MappingResult<T> = Result<T, MappingError>;
