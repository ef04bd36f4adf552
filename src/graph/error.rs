//! Graph-specific error types.
//!
//! The `Display` text of each variant is part of the contract: diagnostics
//! and tests depend on the exact reason strings, and on which reason wins
//! when several preconditions are violated at once (the first in the
//! documented chain).

use thiserror::Error;

/// Errors produced by graph mutations.
///
/// Two classes share this enum: validation errors (a precondition failed;
/// the graph was not touched) and [`GraphError::Consistency`] (paired
/// bookkeeping was already broken when a removal went looking for it —
/// evidence of an earlier invariant breach, surfaced distinctly rather than
/// swallowed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("entity id is already in use")]
    DuplicateEntityId,

    #[error("state edge output cannot be a sensor")]
    StateEdgeOutputIsSensor,

    #[error("state edge input cannot be a module")]
    StateEdgeInputIsModule,

    #[error("output module does not exist")]
    UnknownOutputModule,

    #[error("input sensor does not exist")]
    UnknownInputSensor,

    #[error("output return value does not exist")]
    UnknownReturnValue,

    #[error("input state key does not exist")]
    UnknownStateKey,

    #[error("state edge already exists")]
    DuplicateStateEdge,

    #[error("network edge output cannot be a sensor")]
    NetworkEdgeOutputIsSensor,

    #[error("network edge already exists")]
    DuplicateNetworkEdge,

    #[error("data edge input cannot be a sensor")]
    DataEdgeInputIsSensor,

    #[error("input module does not exist")]
    UnknownInputModule,

    #[error("input param does not exist")]
    UnknownInputParam,

    #[error("output entity does not exist")]
    UnknownOutputEntity,

    #[error("data edge already exists")]
    DuplicateDataEdge,

    #[error("data edge does not exist")]
    DataEdgeNotFound,

    #[error("connector bookkeeping out of sync: {0}")]
    Consistency(String),
}

impl GraphError {
    /// True for bookkeeping-symmetry violations, which indicate a prior
    /// invariant breach rather than a bad request.
    pub fn is_consistency(&self) -> bool {
        matches!(self, GraphError::Consistency(_))
    }
}

/// Result alias for graph mutations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            GraphError::StateEdgeOutputIsSensor.to_string(),
            "state edge output cannot be a sensor"
        );
        assert_eq!(
            GraphError::DataEdgeNotFound.to_string(),
            "data edge does not exist"
        );
        assert_eq!(
            GraphError::UnknownOutputEntity.to_string(),
            "output entity does not exist"
        );
    }

    #[test]
    fn test_consistency_classification() {
        assert!(GraphError::Consistency("missing handle".into()).is_consistency());
        assert!(!GraphError::DuplicateDataEdge.is_consistency());
        assert!(!GraphError::DuplicateEntityId.is_consistency());
    }
}
