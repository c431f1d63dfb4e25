// src/pipeline/task.rs
use std::fmt;
use std::path::PathBuf;

/// The broad category of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Cover,
    Preface,
    Outline,
    Chapter,
    Section,
}

/// Identity of one compilation unit within a build.
///
/// The variant carries the hierarchy indices directly so business logic
/// never branches on strings; the [`fmt::Display`] form is the stable key
/// used for cache persistence and logging (`"cover"`, `"chapter-3"`,
/// `"5/2"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    Cover,
    Preface,
    Outline,
    ChapterCover(usize),
    Section(usize, usize),
}

impl TaskId {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskId::Cover => TaskKind::Cover,
            TaskId::Preface => TaskKind::Preface,
            TaskId::Outline => TaskKind::Outline,
            TaskId::ChapterCover(_) => TaskKind::Chapter,
            TaskId::Section(_, _) => TaskKind::Section,
        }
    }

    /// Stable string form, used as the cache key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Cover => write!(f, "cover"),
            TaskId::Preface => write!(f, "preface"),
            TaskId::Outline => write!(f, "outline"),
            TaskId::ChapterCover(ci) => write!(f, "chapter-{ci}"),
            TaskId::Section(ci, pi) => write!(f, "{ci}/{pi}"),
        }
    }
}

/// One compilable unit of the document. Created once per build by the
/// planner and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    /// Target identifier handed to the external compiler.
    pub target: String,
    /// Where the rendered output lands.
    pub output: PathBuf,
    /// Human-readable label for progress reporting.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_string_forms_match_cache_keys() {
        assert_eq!(TaskId::Cover.key(), "cover");
        assert_eq!(TaskId::Preface.key(), "preface");
        assert_eq!(TaskId::Outline.key(), "outline");
        assert_eq!(TaskId::ChapterCover(3).key(), "chapter-3");
        assert_eq!(TaskId::Section(5, 2).key(), "5/2");
    }

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(TaskId::Cover.kind(), TaskKind::Cover);
        assert_eq!(TaskId::ChapterCover(0).kind(), TaskKind::Chapter);
        assert_eq!(TaskId::Section(0, 0).kind(), TaskKind::Section);
    }
}
