// src/pipeline/config.rs
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Options for one parallel build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Emit the front matter tasks (cover, preface, outline).
    pub frontmatter: bool,
    /// Worker pool size. Defaults to the host's logical core count.
    pub threads: usize,
    /// Extra compiler flags shared by every task of every pass.
    pub extra_flags: Vec<String>,
    /// Restrict the build to these `(chapter index, page index)` pairs.
    /// `None` builds everything.
    pub selected_pages: Option<HashSet<(usize, usize)>>,
    /// On-disk folder name per chapter index, used for labels and passed to
    /// the compiler. Scanned from the content directory when empty.
    pub chapter_folders: Vec<String>,
    /// Page file stems per chapter index (as a string key), same role as
    /// `chapter_folders`.
    pub page_folders: HashMap<String, Vec<String>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            frontmatter: true,
            threads: num_cpus::get().max(1),
            extra_flags: Vec::new(),
            selected_pages: None,
            chapter_folders: Vec::new(),
            page_folders: HashMap::new(),
        }
    }
}

/// Document-level switches controlled by the content/configuration layer.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub display_cover: bool,
    pub display_outline: bool,
    pub display_chapter_cover: bool,
    /// Preface source file; the preface task is emitted only when this file
    /// exists and has non-whitespace content.
    pub preface_file: Option<PathBuf>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            display_cover: true,
            display_outline: true,
            display_chapter_cover: true,
            preface_file: None,
        }
    }
}

/// Answer from the progress callback after each completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Stop,
}

/// Observer hooks for one build. Every field has a no-op default, so
/// callers only fill in what they care about.
pub struct BuildCallbacks {
    /// Called with a human-readable message; the flag is `false` for
    /// warnings and failures.
    pub on_log: Box<dyn Fn(&str, bool) + Send + Sync>,
    /// Called after every successfully compiled task. Returning
    /// [`Progress::Stop`] cancels the build.
    pub on_progress: Box<dyn Fn() -> Progress + Send + Sync>,
}

impl Default for BuildCallbacks {
    fn default() -> Self {
        Self {
            on_log: Box::new(|_, _| {}),
            on_progress: Box::new(|| Progress::Continue),
        }
    }
}

impl std::fmt::Debug for BuildCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildCallbacks").finish_non_exhaustive()
    }
}
