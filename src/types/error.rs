//! Error types for the verification pipeline

use thiserror::Error;

/// Errors surfaced to callers of the pipeline.
///
/// Track rejections are not errors; they come back as
/// [`VerificationDecision`](crate::types::VerificationDecision)s.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unknown mode: {0}")]
    InvalidMode(String),

    #[error("Invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("Supervisor error: {0}")]
    Orchestration(String),

    #[error("Supervisor did not produce a result")]
    NoResult,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the external search capability.
///
/// These never leave the verifier; they degrade to "insufficient BPM data".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error("Search timed out")]
    Timeout,

    #[error("Search backend error: {0}")]
    Backend(String),
}

/// Failures of the candidate-generation capability.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}
