//! Domain-level error types.

use thiserror::Error;

/// Failures of the completion round trip.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The model replied, but not with the JSON object we asked for.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Transport failure, non-success status or an empty reply.
    #[error("Completion API failure: {0}")]
    UpstreamFailure(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Request-shape failures, raised only at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid format for {field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

/// Advisory lock backend errors.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Lock backend error: {0}")]
    Backend(String),
}

/// Everything a generation run can fail with.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Lock(#[from] LockError),
}
