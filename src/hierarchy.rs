// src/hierarchy.rs
//!
//! The chapter/page hierarchy the pipeline builds from, plus the content
//! folder scan that maps hierarchy indices to on-disk folder names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One chapter of the document, holding its pages in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Display number override; the 1-based index is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One section/page inside a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Scan a content directory for chapter folders and page files.
///
/// Chapter folders are directories with purely numeric names, ordered by
/// numeric value; each contributes its numerically named `.typ` file stems,
/// again in numeric order. Folders without any page file are skipped
/// entirely, and the returned page table is keyed by the *re-numbered*
/// chapter index of the surviving folders, matching the hierarchy indices
/// the planner works with.
///
/// A missing or unreadable directory yields empty tables; the planner then
/// falls back to raw indices for labels and compiler inputs.
pub fn scan_content(content_dir: &Path) -> (Vec<String>, HashMap<String, Vec<String>>) {
    let mut chapter_folders = Vec::new();
    let mut page_folders = HashMap::new();

    let Ok(entries) = fs::read_dir(content_dir) else {
        return (chapter_folders, page_folders);
    };

    let mut chapter_dirs: Vec<(u64, String)> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.parse::<u64>().ok().map(|n| (n, name))
        })
        .collect();
    chapter_dirs.sort_by_key(|(n, _)| *n);

    for (_, dir_name) in chapter_dirs {
        let mut stems: Vec<(u64, String)> = fs::read_dir(content_dir.join(&dir_name))
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|e| {
                        let path = e.path();
                        if path.extension().and_then(|s| s.to_str()) != Some("typ") {
                            return None;
                        }
                        let stem = path.file_stem()?.to_string_lossy().into_owned();
                        stem.parse::<u64>().ok().map(|n| (n, stem))
                    })
                    .collect()
            })
            .unwrap_or_default();
        stems.sort_by_key(|(n, _)| *n);

        if !stems.is_empty() {
            let index = chapter_folders.len();
            chapter_folders.push(dir_name);
            page_folders.insert(
                index.to_string(),
                stems.into_iter().map(|(_, s)| s).collect(),
            );
        }
    }

    (chapter_folders, page_folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_orders_numerically_and_skips_empty_folders() {
        let dir = tempfile::tempdir().unwrap();
        // 10 must sort after 2, "notes" must be ignored, 5 has no pages.
        for ch in ["2", "10", "5", "notes"] {
            fs::create_dir(dir.path().join(ch)).unwrap();
        }
        fs::write(dir.path().join("2/3.typ"), "").unwrap();
        fs::write(dir.path().join("2/10.typ"), "").unwrap();
        fs::write(dir.path().join("2/draft.typ"), "").unwrap();
        fs::write(dir.path().join("10/0.typ"), "").unwrap();
        fs::write(dir.path().join("notes/0.typ"), "").unwrap();

        let (chapters, pages) = scan_content(dir.path());
        assert_eq!(chapters, vec!["2".to_string(), "10".to_string()]);
        assert_eq!(pages["0"], vec!["3".to_string(), "10".to_string()]);
        assert_eq!(pages["1"], vec!["0".to_string()]);
        assert!(!pages.contains_key("2"));
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let (chapters, pages) = scan_content(Path::new("/nonexistent/content"));
        assert!(chapters.is_empty());
        assert!(pages.is_empty());
    }
}
