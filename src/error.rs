//! Error handling for the FlowVis-RS application.
//!
//! Graph mutations carry their own contract-bearing error type
//! ([`crate::graph::GraphError`]); this module wraps it together with the
//! application-level failure modes (preferences IO, serialization) behind a
//! single crate `Result`.

use thiserror::Error;

use crate::graph::GraphError;

/// Main error type for FlowVis-RS operations.
#[derive(Error, Debug)]
pub enum FlowVisError {
    /// A graph mutation was rejected or found broken bookkeeping.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors related to configuration loading/saving.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowVisError>,
    },
}

impl FlowVisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for FlowVis-RS operations.
pub type Result<T> = std::result::Result<T, FlowVisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlowVisError::Config("missing directory".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing directory");
    }

    #[test]
    fn test_graph_error_conversion() {
        let err: FlowVisError = GraphError::DataEdgeNotFound.into();
        assert!(err.to_string().contains("data edge does not exist"));
    }

    #[test]
    fn test_error_with_context() {
        let err = FlowVisError::Config("bad toml".to_string());
        let with_ctx = err.with_context("Failed to load preferences");
        assert!(with_ctx.to_string().contains("Failed to load preferences"));
    }
}
