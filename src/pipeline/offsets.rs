// src/pipeline/offsets.rs
use super::cache::PageCountCache;
use super::task::TaskId;
use std::collections::HashMap;

/// Project the 1-based starting page of every task as a prefix sum of
/// predicted page counts over document order.
///
/// Pure with respect to the cache: reading a prediction never inserts one.
/// Called before the first pass (cold projection) and after every pass to
/// detect drift against real counts.
pub fn project_offsets(ordered: &[TaskId], cache: &PageCountCache) -> HashMap<String, u32> {
    let mut offsets = HashMap::with_capacity(ordered.len());
    let mut current = 1u32;
    for id in ordered {
        let key = id.key();
        let predicted = cache.get(&key);
        offsets.insert(key, current);
        current += predicted;
    }
    offsets
}
