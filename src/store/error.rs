//! Store error types
//!
//! Separates "the store could not be reached" from "a statement against a
//! reachable store failed". Neither is used for "no matching rows", which is
//! an empty result.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the relational store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened or has gone away
    #[error("Store unavailable at {path:?}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// A query or statement failed against an open store
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Reading a SQL script from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the failure means the store itself is unreachable
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unavailable { .. } => true,
            StoreError::Query(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
