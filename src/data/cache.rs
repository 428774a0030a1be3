//! Workbook Cache Module
//! Read-through cache of load outcomes keyed by workbook path and modification time.

use crate::data::loader::{load_workbook, LoadOutcome, SheetSpec};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::debug;

struct CacheEntry {
    modified: SystemTime,
    spec: SheetSpec,
    outcome: Arc<LoadOutcome>,
}

/// Process-wide cache owned by the dashboard and handed to whoever loads.
///
/// One entry per workbook path. An entry is reused only while the file's
/// modification time and the sheet rules are unchanged.
#[derive(Default)]
pub struct WorkbookCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl WorkbookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `path`, loading it on a miss.
    pub fn load(&self, path: &Path, spec: &SheetSpec) -> Arc<LoadOutcome> {
        let mut entries = self.lock();

        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "workbook metadata unavailable, not caching"
                );
                entries.remove(path);
                return Arc::new(load_workbook(path, spec));
            }
        };

        if let Some(entry) = entries.get(path) {
            if entry.modified == modified && &entry.spec == spec {
                debug!(path = %path.display(), "workbook cache hit");
                return Arc::clone(&entry.outcome);
            }
        }

        debug!(path = %path.display(), "workbook cache miss");
        let outcome = Arc::new(load_workbook(path, spec));
        entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                spec: spec.clone(),
                outcome: Arc::clone(&outcome),
            },
        );
        outcome
    }

    /// Drop the entry for one workbook so the next load re-reads it.
    pub fn invalidate(&self, path: &Path) {
        self.lock().remove(path);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        // A panic while holding the lock cannot leave an entry half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
