// src/compiler.rs
//!
//! The seam between the build pipeline and the external typesetting
//! toolchain.
//!
//! The pipeline never runs `typst` or a PDF inspector itself; it drives an
//! implementation of [`Compiler`] supplied by the caller. The contract is
//! deliberately small: compile one target into one output file at a given
//! starting page number, and read back how many pages that file contains.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by a [`Compiler`] implementation.
#[derive(Error, Debug)]
pub enum CompilerError {
    /// The compiler process could not be launched.
    #[error("failed to launch compiler: {0}")]
    Spawn(#[from] std::io::Error),

    /// The compiler ran but reported an error for this target.
    #[error("compiler error: {0}")]
    Failed(String),

    /// The rendered output exists but its page count could not be read.
    #[error("could not read page count of '{path}': {reason}")]
    PageCount { path: PathBuf, reason: String },
}

/// External typesetting compiler, invoked once per task per pass.
///
/// Implementations must be safe to call from several worker threads at
/// once. `compile` must leave a readable file at `output` on success;
/// `page_count` is called on that file immediately afterwards by the same
/// worker.
pub trait Compiler: Send + Sync {
    /// Compile `target` into `output`, telling the typesetter that the
    /// rendered unit begins at 1-based page `page_offset`. `extra_flags`
    /// are passed through verbatim and are identical for every task of a
    /// pass.
    fn compile(
        &self,
        target: &str,
        output: &Path,
        page_offset: u32,
        extra_flags: &[String],
    ) -> Result<(), CompilerError>;

    /// Number of pages in a rendered output file.
    fn page_count(&self, output: &Path) -> Result<u32, CompilerError>;
}
