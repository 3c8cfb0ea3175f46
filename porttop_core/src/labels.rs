//! Port labels: user-chosen display names keyed by port, stored as a small JSON file
//! (`{ "version": 1, "labels": { "3000": "My App" } }`).

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};
use tracing::{info, warn};

use crate::error::LabelError;

const FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabelsFile {
    #[serde(default)]
    pub labels: BTreeMap<u16, String>,
    #[serde(default)]
    pub version: u32,
}

/// Shared label map. Reads take a read lock; writers persist while holding the write
/// lock so concurrent renames serialize.
#[derive(Debug, Default)]
pub struct LabelStore {
    path: Option<PathBuf>,
    labels: RwLock<BTreeMap<u16, String>>,
}

impl LabelStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. Missing file means no labels; an unreadable one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let labels = load_labels(&path).labels;
        Self {
            path: Some(path),
            labels: RwLock::new(labels),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, port: u16) -> Option<String> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&port)
            .cloned()
    }

    /// Set or clear a label. The name is trimmed; an empty result deletes the entry.
    /// The in-memory change sticks even when persisting fails.
    pub fn set(&self, port: u16, name: &str) -> Result<(), LabelError> {
        let name = name.trim();
        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        if name.is_empty() {
            if labels.remove(&port).is_none() {
                return Ok(());
            }
            info!(port, "label cleared");
        } else {
            labels.insert(port, name.to_string());
            info!(port, name, "label set");
        }
        self.persist(&labels)
    }

    pub fn all(&self) -> BTreeMap<u16, String> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop every label.
    pub fn clear(&self) -> Result<(), LabelError> {
        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        labels.clear();
        self.persist(&labels)
    }

    fn persist(&self, labels: &BTreeMap<u16, String>) -> Result<(), LabelError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let file = LabelsFile {
            labels: labels.clone(),
            version: FILE_VERSION,
        };
        let data = serde_json::to_vec_pretty(&file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LabelError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(path, data).map_err(|source| LabelError::Write {
            path: path.clone(),
            source,
        })
    }
}

pub fn load_labels(path: &Path) -> LabelsFile {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!("ignoring unreadable label file {}: {e}", path.display());
            LabelsFile::default()
        }),
        Err(_) => LabelsFile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_clear_by_empty_name() {
        let store = LabelStore::in_memory();
        store.set(3000, "My App").unwrap();
        assert_eq!(store.get(3000).as_deref(), Some("My App"));

        store.set(3000, "").unwrap();
        assert_eq!(store.get(3000), None);
        assert!(!store.all().contains_key(&3000));
    }

    #[test]
    fn whitespace_name_deletes_and_names_are_trimmed() {
        let store = LabelStore::in_memory();
        store.set(8080, "  api  ").unwrap();
        assert_eq!(store.get(8080).as_deref(), Some("api"));
        store.set(8080, "   ").unwrap();
        assert!(store.all().is_empty());
    }

    #[test]
    fn clearing_an_absent_port_is_a_no_op() {
        let store = LabelStore::in_memory();
        store.set(1, "").unwrap();
        assert!(store.all().is_empty());
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labels.json");
        let store = LabelStore::open(&path);
        store.set(5432, "Main DB").unwrap();
        store.set(3000, "Web").unwrap();

        let reopened = LabelStore::open(&path);
        assert_eq!(reopened.get(5432).as_deref(), Some("Main DB"));
        assert_eq!(reopened.all().len(), 2);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"5432\""), "{raw}");
        assert!(raw.contains("\"version\": 1"), "{raw}");
    }

    #[test]
    fn clear_wipes_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        let store = LabelStore::open(&path);
        store.set(1234, "x").unwrap();
        store.clear().unwrap();
        assert!(LabelStore::open(&path).all().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, "{ not json").unwrap();
        let store = LabelStore::open(&path);
        assert!(store.all().is_empty());
        // and a write replaces it with a valid file
        store.set(80, "web").unwrap();
        assert_eq!(LabelStore::open(&path).get(80).as_deref(), Some("web"));
    }

    #[test]
    fn write_failure_keeps_in_memory_label() {
        let dir = tempfile::tempdir().unwrap();
        // parent is a regular file, so the write cannot succeed
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = LabelStore::open(blocker.join("labels.json"));
        let err = store.set(3000, "My App").unwrap_err();
        assert!(matches!(err, LabelError::Write { .. }), "{err}");
        assert_eq!(store.get(3000).as_deref(), Some("My App"));
    }
}
