//! View-count store
//!
//! Persists how many times each filesystem identity was opened, as a
//! small JSON file written through on every bump.

use crate::info::FsId;
use crate::{FsError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct ViewStore {
    path: PathBuf,
    counts: Mutex<HashMap<String, i64>>,
}

impl ViewStore {
    /// Open the store at `path`, starting empty if the file is missing or
    /// unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let counts = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        Self {
            path,
            counts: Mutex::new(counts),
        }
    }

    /// Times the entry was opened, if ever.
    pub fn total_views(&self, id: &FsId) -> Option<i64> {
        self.counts.lock().get(id.as_str()).copied()
    }

    /// Bump the counter and persist the store.
    pub fn increase_total_views(&self, id: &FsId) -> Result<i64> {
        let serialized;
        let count;
        {
            let mut counts = self.counts.lock();
            let entry = counts.entry(id.as_str().to_owned()).or_insert(0);
            *entry += 1;
            count = *entry;
            serialized = serde_json::to_string_pretty(&*counts)
                .map_err(|err| FsError::Store(err.to_string()))?;
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serialized)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_start_absent_and_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let store = ViewStore::open(dir.path().join("views.json"));
        let id = FsId::new("abc");

        assert_eq!(store.total_views(&id), None);
        assert_eq!(store.increase_total_views(&id).unwrap(), 1);
        assert_eq!(store.increase_total_views(&id).unwrap(), 2);
        assert_eq!(store.total_views(&id), Some(2));
    }

    #[test]
    fn counts_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        let id = FsId::new("abc");

        ViewStore::open(&path).increase_total_views(&id).unwrap();

        let reopened = ViewStore::open(&path);
        assert_eq!(reopened.total_views(&id), Some(1));
    }
}
