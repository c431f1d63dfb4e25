// src/lib.rs
//!
//! `quire` compiles a tree of small document units (cover, preface, table
//! of contents, chapter covers, sections) into individually rendered pages
//! and hands back one continuously paginated set of outputs.
//!
//! The external typesetter must be told, up front, the page each unit
//! starts on; that page is only known after the preceding units have been
//! rendered and measured. The [`BuildPipeline`] breaks this circular
//! dependency with an iterative fixed-point build: predict offsets from a
//! persisted page-count cache, compile everything in parallel, measure,
//! and recompile only the suffix of the document whose offsets drifted,
//! up to a hard pass ceiling.
//!
//! The typesetter itself sits behind the [`Compiler`] trait; merging the
//! per-unit outputs and writing bookmarks are downstream concerns of the
//! caller, fed by [`BuildOutput`].

pub mod compiler;
pub mod error;
pub mod hierarchy;
pub mod pipeline;

pub use compiler::{Compiler, CompilerError};
pub use error::BuildError;
pub use hierarchy::{Chapter, Page, scan_content};
pub use pipeline::{
    BuildCallbacks, BuildOptions, BuildOutput, BuildPipeline, DocumentConfig, PageCountCache,
    Progress, Task, TaskId, TaskKind,
};
