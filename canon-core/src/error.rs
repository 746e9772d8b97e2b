//! Error types for problem transformation.

use thiserror::Error;

/// Errors a transform stage can report.
///
/// Stages fail eagerly and return no partial output; a failed transform
/// leaves its input untouched. Transforms are deterministic, so retrying
/// with the same input reproduces the same failure.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Input uses constructs this stage cannot lower
    /// (nonlinear terms, strict inequalities).
    #[error("unsupported problem shape: {0}")]
    UnsupportedProblemShape(String),

    /// Input violates the data model invariants
    /// (dangling variable reference, dimension mismatch).
    #[error("malformed problem: {0}")]
    MalformedProblem(String),
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// A stage failure surfaced by the pipeline driver.
///
/// Carries the name of the originating stage so the caller can report
/// which rewrite rejected the problem. The driver aborts the chain on the
/// first failure.
#[derive(Error, Debug)]
#[error("transform stage '{stage}' failed: {source}")]
pub struct PipelineError {
    /// Name of the stage that failed.
    pub stage: String,

    /// The underlying transform error.
    #[source]
    pub source: TransformError,
}
