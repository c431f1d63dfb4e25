// src/pipeline/scheduler.rs
//!
//! Bounded worker pool for one compilation pass.
//!
//! Every pass submits its tasks to a bounded job channel drained by N
//! blocking workers. Each worker compiles one task against its projected
//! offset, reads the real page count back, and records it in the shared
//! cache. There is no ordering guarantee inside a pass; the pass only
//! returns once every worker has drained out, so the next pass always sees
//! fully applied results.
//!
//! Cancellation is cooperative: a shared flag is checked between jobs, so
//! an in-flight compile finishes but nothing new starts.

use super::cache::PageCountCache;
use super::config::{BuildCallbacks, Progress};
use super::task::{Task, TaskId};
use crate::compiler::{Compiler, CompilerError};
use crate::error::BuildError;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task;

/// One unit of work handed to a worker: everything it needs, owned.
struct Job {
    id: TaskId,
    target: String,
    output: PathBuf,
    offset: u32,
}

/// Run `to_run` (a suffix or the whole of the ordered task list) through
/// the worker pool, compiling each task at its currently projected offset.
///
/// Results are observed through the mutated cache; the output files are at
/// the paths the planner assigned. Any task failure aborts the pass, as
/// does a [`Progress::Stop`] from the progress callback.
pub(crate) async fn run_pass(
    to_run: &[TaskId],
    task_map: &HashMap<TaskId, Task>,
    offsets: &HashMap<String, u32>,
    flags: Arc<Vec<String>>,
    workers: usize,
    compiler: Arc<dyn Compiler>,
    cache: Arc<PageCountCache>,
    cancel: Arc<AtomicBool>,
    callbacks: &BuildCallbacks,
) -> Result<(), BuildError> {
    let jobs: Vec<Job> = to_run
        .iter()
        .map(|id| {
            let task = &task_map[id];
            Job {
                id: *id,
                target: task.target.clone(),
                output: task.output.clone(),
                offset: offsets[&id.key()],
            }
        })
        .collect();
    let total = jobs.len();
    if total == 0 {
        return Ok(());
    }
    let worker_count = workers.clamp(1, total);

    let (job_tx, job_rx) = async_channel::bounded::<Job>(worker_count);
    let (result_tx, result_rx) =
        async_channel::bounded::<(TaskId, Result<u32, CompilerError>)>(worker_count);

    let feeder = task::spawn(async move {
        for job in jobs {
            // Fails only once every worker is gone (pass aborted).
            if job_tx.send(job).await.is_err() {
                break;
            }
        }
    });

    let mut worker_handles = Vec::with_capacity(worker_count);
    for worker_id in 0..worker_count {
        let job_rx = job_rx.clone();
        let result_tx = result_tx.clone();
        let compiler = Arc::clone(&compiler);
        let cache = Arc::clone(&cache);
        let flags = Arc::clone(&flags);
        let cancel = Arc::clone(&cancel);

        worker_handles.push(task::spawn_blocking(move || {
            debug!("[WORKER-{worker_id}] Started.");
            while let Ok(job) = job_rx.recv_blocking() {
                if cancel.load(Ordering::SeqCst) {
                    debug!("[WORKER-{worker_id}] Cancellation requested, draining.");
                    break;
                }
                let result = compiler
                    .compile(&job.target, &job.output, job.offset, &flags)
                    .and_then(|()| compiler.page_count(&job.output))
                    .inspect(|&count| cache.set(&job.id.key(), count));
                if result_tx.send_blocking((job.id, result)).is_err() {
                    break;
                }
            }
            debug!("[WORKER-{worker_id}] Shutting down.");
        }));
    }
    drop(result_tx);
    drop(job_rx);

    let mut outcome = Ok(());
    while let Ok((id, result)) = result_rx.recv().await {
        match result {
            Ok(count) => {
                debug!("[SCHEDULER] Task {id} rendered {count} page(s).");
                if (callbacks.on_progress)() == Progress::Stop {
                    warn!("[SCHEDULER] Stop requested by progress callback.");
                    cancel.store(true, Ordering::SeqCst);
                    outcome = Err(BuildError::Cancelled);
                    break;
                }
            }
            Err(e) => {
                let message = format!("Task {id} failed: {e}");
                warn!("[SCHEDULER] {message}");
                (callbacks.on_log)(&message, false);
                cancel.store(true, Ordering::SeqCst);
                outcome = Err(BuildError::Compile {
                    key: id.key(),
                    source: e,
                });
                break;
            }
        }
    }

    // Closing the result channel unblocks any worker parked on a send when
    // the pass aborts early; joining keeps the pass boundary strict.
    drop(result_rx);
    feeder.await.unwrap();
    for handle in worker_handles {
        handle.await.unwrap();
    }
    outcome
}
