// src/pipeline/planner.rs
use super::config::{BuildOptions, DocumentConfig};
use super::task::{Task, TaskId};
use crate::hierarchy::Chapter;
use std::fs;
use std::path::Path;

/// Produce the ordered task list for a build.
///
/// The returned order *is* document order and is the single source of truth
/// for pagination: front matter first, then for every chapter with at least
/// one included page its cover task followed by its section tasks in page
/// index order. A chapter whose pages are all filtered out emits nothing,
/// not even its cover. Keys are unique by construction.
pub fn plan_tasks(
    chapters: &[Chapter],
    config: &DocumentConfig,
    options: &BuildOptions,
    build_dir: &Path,
) -> Vec<Task> {
    let mut tasks = Vec::new();

    if options.frontmatter {
        if config.display_cover {
            tasks.push(Task {
                id: TaskId::Cover,
                target: "cover".to_string(),
                output: build_dir.join("00_cover.pdf"),
                label: "Cover".to_string(),
            });
        }
        if has_preface(config) {
            tasks.push(Task {
                id: TaskId::Preface,
                target: "preface".to_string(),
                output: build_dir.join("01_preface.pdf"),
                label: "Preface".to_string(),
            });
        }
        if config.display_outline {
            tasks.push(Task {
                id: TaskId::Outline,
                target: "outline".to_string(),
                output: build_dir.join("02_outline.pdf"),
                label: "TOC".to_string(),
            });
        }
    }

    for (ci, chapter) in chapters.iter().enumerate() {
        let included: Vec<usize> = (0..chapter.pages.len())
            .filter(|&pi| match &options.selected_pages {
                Some(selection) => selection.contains(&(ci, pi)),
                None => true,
            })
            .collect();
        if included.is_empty() {
            continue;
        }

        let ch_folder = options
            .chapter_folders
            .get(ci)
            .cloned()
            .unwrap_or_else(|| ci.to_string());
        let page_files = options.page_folders.get(&ci.to_string());

        if config.display_chapter_cover {
            tasks.push(Task {
                id: TaskId::ChapterCover(ci),
                target: format!("chapter-{ci}"),
                output: build_dir.join(format!("10_chapter_{ci}_cover.pdf")),
                label: format!("Chapter {ch_folder}"),
            });
        }

        for pi in included {
            let pg_file = page_files
                .and_then(|files| files.get(pi).cloned())
                .unwrap_or_else(|| pi.to_string());
            tasks.push(Task {
                id: TaskId::Section(ci, pi),
                target: format!("{ci}/{pi}"),
                output: build_dir.join(format!("20_page_{ci}_{pi}.pdf")),
                label: format!("Section {pg_file}: {}", chapter.pages[pi].title),
            });
        }
    }

    tasks
}

/// A preface exists only when the configured file has non-whitespace
/// content; read errors count as "no preface".
fn has_preface(config: &DocumentConfig) -> bool {
    config
        .preface_file
        .as_deref()
        .and_then(|path| fs::read_to_string(path).ok())
        .is_some_and(|text| !text.trim().is_empty())
}
