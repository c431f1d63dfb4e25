// src/error.rs
use crate::compiler::CompilerError;
use thiserror::Error;

/// A comprehensive error type for the document build pipeline.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A task's compile (or page-count read) failed. The whole build aborts;
    /// there is no partial-document output contract.
    #[error("task {key} failed: {source}")]
    Compile {
        key: String,
        #[source]
        source: CompilerError,
    },

    /// The progress callback asked the build to stop. Distinct from
    /// [`BuildError::Compile`] so callers can clean up the build directory
    /// without treating the stop as a failure.
    #[error("build cancelled by caller")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
