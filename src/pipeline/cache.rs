// src/pipeline/cache.rs
use log::warn;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default prediction for a task that has never been measured.
const DEFAULT_PAGE_COUNT: u32 = 1;

/// Persisted map from task key to the last observed rendered page count.
///
/// The cache is a pure optimization: it seeds the offset projection so an
/// unchanged document converges in a single pass. It is never a source of
/// build failure. A missing or corrupt file loads as empty, and a failed
/// save is logged and ignored. Writes go through a mutex because scheduler
/// workers record counts concurrently.
#[derive(Debug)]
pub struct PageCountCache {
    path: PathBuf,
    counts: Mutex<HashMap<String, u32>>,
}

impl PageCountCache {
    /// Load the cache stored in `build_dir/page_cache.json`.
    pub fn load(build_dir: &Path) -> Self {
        let path = build_dir.join("page_cache.json");
        let counts = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring corrupt page cache at {}: {e}", path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            counts: Mutex::new(counts),
        }
    }

    /// Predicted page count for `key`: last observed, or 1 if never seen.
    pub fn get(&self, key: &str) -> u32 {
        self.counts
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(DEFAULT_PAGE_COUNT)
    }

    /// Record the real page count of a freshly compiled task.
    pub fn set(&self, key: &str, count: u32) {
        self.counts.lock().unwrap().insert(key.to_string(), count);
    }

    /// Best-effort flush to disk. A write failure downgrades the next build
    /// to cold predictions but never fails this one.
    pub fn save(&self) {
        let counts = self.counts.lock().unwrap();
        let json = match serde_json::to_string(&*counts) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize page cache: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!("Failed to write page cache to {}: {e}", self.path.display());
        }
    }
}
