// src/pipeline/orchestrator.rs
use super::cache::PageCountCache;
use super::config::{BuildCallbacks, BuildOptions, DocumentConfig};
use super::offsets::project_offsets;
use super::planner::plan_tasks;
use super::scheduler::run_pass;
use super::task::{Task, TaskId};
use crate::compiler::Compiler;
use crate::error::BuildError;
use crate::hierarchy::{Chapter, scan_content};
use log::{info, warn};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::runtime::Builder;

/// Hard ceiling on the number of compilation passes per build.
const MAX_PASSES: usize = 3;

/// Result of a successful build: one output file per task, in document
/// order, plus the offsets the tasks were last compiled against. Downstream
/// merging and bookmark generation consume both.
#[derive(Debug)]
pub struct BuildOutput {
    pub outputs: Vec<PathBuf>,
    pub page_map: HashMap<String, u32>,
}

/// The parallel document build pipeline.
///
/// Each document unit must be compiled knowing the page it starts on, but
/// that page is only known once every earlier unit has been rendered and
/// measured. The pipeline breaks the circle iteratively: it predicts
/// offsets from the page-count cache, compiles everything concurrently,
/// re-projects offsets from the measured counts, and recompiles the suffix
/// of the document whose predictions turned out wrong, until the pagination
/// is self-consistent or [`MAX_PASSES`] is reached. With a warm cache the
/// common case is a single pass.
pub struct BuildPipeline {
    build_dir: PathBuf,
    content_dir: PathBuf,
    compiler: Arc<dyn Compiler>,
    options: BuildOptions,
    callbacks: BuildCallbacks,
}

impl BuildPipeline {
    pub fn new(
        build_dir: impl Into<PathBuf>,
        compiler: Arc<dyn Compiler>,
        options: BuildOptions,
        callbacks: BuildCallbacks,
    ) -> Self {
        Self {
            build_dir: build_dir.into(),
            content_dir: PathBuf::from("content"),
            compiler,
            options,
            callbacks,
        }
    }

    /// Where to scan for chapter/page folder names when the options carry
    /// no folder tables. Defaults to `content` in the working directory.
    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    /// Build every selected unit of the document, converging on a
    /// self-consistent pagination. Blocks until the build finishes.
    pub fn build_parallel(
        &self,
        chapters: &[Chapter],
        config: &DocumentConfig,
    ) -> Result<BuildOutput, BuildError> {
        fs::create_dir_all(&self.build_dir)?;

        let rt = Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        rt.block_on(self.build_parallel_async(chapters, config))
    }

    async fn build_parallel_async(
        &self,
        chapters: &[Chapter],
        config: &DocumentConfig,
    ) -> Result<BuildOutput, BuildError> {
        let on_log = &self.callbacks.on_log;
        let cache = Arc::new(PageCountCache::load(&self.build_dir));

        // Use the caller's folder tables when supplied, otherwise scan.
        let mut options = self.options.clone();
        if options.chapter_folders.is_empty() || options.page_folders.is_empty() {
            let (ch_folders, pg_folders) = scan_content(&self.content_dir);
            options.chapter_folders = ch_folders;
            options.page_folders = pg_folders;
        }

        // Folder tables ride along to every compile as shared input flags.
        let mut flags = options.extra_flags.clone();
        flags.push("--input".to_string());
        flags.push(format!("chapter-folders={}", json!(&options.chapter_folders)));
        flags.push("--input".to_string());
        flags.push(format!("page-folders={}", json!(&options.page_folders)));
        let flags = Arc::new(flags);

        on_log(
            &format!("Building {} chapters (parallel)", chapters.len()),
            true,
        );
        let tasks = plan_tasks(chapters, config, &options, &self.build_dir);
        on_log(&format!("Generated {} tasks", tasks.len()), true);
        info!("[PLAN] {} tasks over {} chapters.", tasks.len(), chapters.len());

        if tasks.is_empty() {
            return Ok(BuildOutput {
                outputs: Vec::new(),
                page_map: HashMap::new(),
            });
        }

        let ordered: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        let task_map: HashMap<TaskId, Task> = tasks.into_iter().map(|t| (t.id, t)).collect();
        let cancel = Arc::new(AtomicBool::new(false));

        let mut projected = project_offsets(&ordered, &cache);

        on_log("Build Pass 1...", true);
        info!("[PASS-1] Compiling all {} tasks.", ordered.len());
        self.execute_pass(&ordered, &task_map, &projected, &flags, &cache, &cancel)
            .await?;

        let mut pass = 1;
        loop {
            let fresh = project_offsets(&ordered, &cache);
            let Some(dirty_index) = ordered
                .iter()
                .position(|id| fresh[&id.key()] != projected[&id.key()])
            else {
                info!("[PASS-{pass}] Pagination converged.");
                break;
            };

            if pass >= MAX_PASSES {
                on_log("Max retries reached. Pagination might be unstable.", false);
                warn!(
                    "[PASS-{pass}] Pagination still drifting at {} after {MAX_PASSES} passes.",
                    ordered[dirty_index]
                );
                break;
            }
            pass += 1;

            // Offsets are a prefix sum, so one changed count invalidates the
            // starting page of everything after it.
            projected = fresh;
            let suffix = &ordered[dirty_index..];
            on_log(
                &format!(
                    "Detected layout shift at {}. Recompiling {} tasks.",
                    ordered[dirty_index],
                    suffix.len()
                ),
                true,
            );
            on_log(&format!("Build Pass {pass}..."), true);
            info!(
                "[PASS-{pass}] Recompiling {} tasks from {}.",
                suffix.len(),
                ordered[dirty_index]
            );
            self.execute_pass(suffix, &task_map, &projected, &flags, &cache, &cancel)
                .await?;
        }

        cache.save();

        Ok(BuildOutput {
            outputs: ordered.iter().map(|id| task_map[id].output.clone()).collect(),
            page_map: projected,
        })
    }

    async fn execute_pass(
        &self,
        to_run: &[TaskId],
        task_map: &HashMap<TaskId, Task>,
        offsets: &HashMap<String, u32>,
        flags: &Arc<Vec<String>>,
        cache: &Arc<PageCountCache>,
        cancel: &Arc<AtomicBool>,
    ) -> Result<(), BuildError> {
        run_pass(
            to_run,
            task_map,
            offsets,
            Arc::clone(flags),
            self.options.threads,
            Arc::clone(&self.compiler),
            Arc::clone(cache),
            Arc::clone(cancel),
            &self.callbacks,
        )
        .await
    }
}
