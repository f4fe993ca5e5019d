//! Store failure policy

use super::{DaoError, DaoResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// What the facade does when the store fails mid-operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log at `warn` and return an empty collection or `None`
    #[default]
    BestEffort,
    /// Return [`DaoError::Store`]
    Strict,
}

impl FailurePolicy {
    /// Apply the policy to an operation's outcome
    ///
    /// Only store faults are recoverable. Mapping and date errors always
    /// propagate.
    pub(crate) fn settle<T>(
        self,
        operation: &'static str,
        outcome: DaoResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> DaoResult<T> {
        match (self, outcome) {
            (FailurePolicy::BestEffort, Err(DaoError::Store(e))) => {
                tracing::warn!(
                    operation,
                    error = %e,
                    unavailable = e.is_unavailable(),
                    "Store error, returning empty result"
                );
                Ok(fallback())
            }
            (_, outcome) => outcome,
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::BestEffort => write!(f, "best_effort"),
            FailurePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(FailurePolicy::BestEffort),
            "strict" => Ok(FailurePolicy::Strict),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MappingError;
    use crate::store::StoreError;

    fn store_fault() -> DaoResult<Vec<i32>> {
        Err(StoreError::Query(rusqlite::Error::QueryReturnedNoRows).into())
    }

    #[test]
    fn test_best_effort_swallows_store_errors() {
        let settled = FailurePolicy::BestEffort.settle("test", store_fault(), Vec::new);
        assert_eq!(settled.unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_strict_propagates_store_errors() {
        let settled = FailurePolicy::Strict.settle("test", store_fault(), Vec::new);
        assert!(matches!(settled, Err(DaoError::Store(_))));
    }

    #[test]
    fn test_mapping_errors_always_propagate() {
        let outcome: DaoResult<Vec<i32>> =
            Err(MappingError::incomplete("result", 1, "method").into());
        let settled = FailurePolicy::BestEffort.settle("test", outcome, Vec::new);
        assert!(matches!(settled, Err(DaoError::Mapping(_))));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("strict".parse::<FailurePolicy>(), Ok(FailurePolicy::Strict));
        assert_eq!(
            "Best-Effort".parse::<FailurePolicy>(),
            Ok(FailurePolicy::BestEffort)
        );
        assert!("lenient".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::BestEffort.to_string(), "best_effort");
        assert_eq!(FailurePolicy::default(), FailurePolicy::BestEffort);
    }
}
