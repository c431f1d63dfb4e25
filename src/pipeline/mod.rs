// src/pipeline/mod.rs
//!
//! Parallel build orchestration.
//!
//! The pipeline turns a chapter/page hierarchy into an ordered list of
//! compilation tasks, predicts each task's starting page from the persisted
//! page-count cache, compiles tasks concurrently, and iterates until the
//! document's pagination is self-consistent:
//!
//! - [`task`]: task identity and the immutable task record
//! - [`planner`]: hierarchy + options -> ordered task list
//! - [`offsets`]: ordered tasks + cache -> projected page offsets
//! - [`cache`]: persisted page counts from earlier builds
//! - [`scheduler`]: bounded worker pool for one pass (internal)
//! - [`orchestrator`]: the convergence loop driving it all
//!
//! # Example
//!
//! ```ignore
//! use quire::{BuildCallbacks, BuildOptions, BuildPipeline, DocumentConfig};
//!
//! let pipeline = BuildPipeline::new(
//!     "build",
//!     compiler,
//!     BuildOptions::default(),
//!     BuildCallbacks::default(),
//! );
//! let output = pipeline.build_parallel(&chapters, &DocumentConfig::default())?;
//! // output.outputs is ready for merging, output.page_map for bookmarks.
//! ```

pub mod cache;
pub mod config;
pub mod offsets;
mod orchestrator;
pub mod planner;
pub(crate) mod scheduler;
pub mod task;

pub use cache::PageCountCache;
pub use config::{BuildCallbacks, BuildOptions, DocumentConfig, Progress};
pub use offsets::project_offsets;
pub use orchestrator::{BuildOutput, BuildPipeline};
pub use planner::plan_tasks;
pub use task::{Task, TaskId, TaskKind};
