//! DAO error types

use crate::cvmap::CvMapError;
use crate::model::MappingError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the DAO facade
#[derive(Error, Debug)]
pub enum DaoError {
    /// Store fault, only surfaced under [`super::FailurePolicy::Strict`]
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A row broke its ownership chain
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A date bound could not be parsed
    #[error("Invalid date: {input:?}")]
    InvalidDate { input: String },

    /// The CV mapping could not be loaded
    #[error("CV map error: {0}")]
    CvMap(#[from] CvMapError),
}

/// Result type for DAO operations
pub type DaoResult<T> = Result<T, DaoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DaoError::InvalidDate {
            input: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid date: \"yesterday\"");

        let err: DaoError = MappingError::incomplete("value", 3, "method").into();
        assert_eq!(
            err.to_string(),
            "Mapping error: Incomplete value record 3: missing method"
        );
    }
}
