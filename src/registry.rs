use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::{json, Value};

use crate::level::{self, LevelId};

/// Key under which the completed level ids are stored.
pub const NAMESPACE: &str = "elderlyGameCompletedLevels";

/// Levels the player has finished at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRegistry {
    completed: BTreeSet<LevelId>,
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the level was not recorded before.
    pub fn record(&mut self, id: LevelId) -> bool {
        self.completed.insert(id)
    }

    pub fn is_completed(&self, id: LevelId) -> bool {
        self.completed.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.completed.iter().copied()
    }

    /// Serialized form: `{"<NAMESPACE>": [ids...]}`.
    pub fn to_json(&self) -> Value {
        json!({ NAMESPACE: self.completed.iter().collect::<Vec<_>>() })
    }

    /// Reads whatever can be salvaged from a stored document. Entries that are
    /// not level ids are dropped; a document without the key is empty.
    pub fn from_json(doc: &Value) -> Self {
        let mut registry = Self::new();
        let Some(entries) = doc.get(NAMESPACE).and_then(Value::as_array) else {
            if !doc.is_null() {
                warn!("Completion record has no {NAMESPACE} list, starting fresh");
            }
            return registry;
        };

        for entry in entries {
            match entry.as_i64() {
                Some(id) if level::is_valid_id(id) => {
                    registry.record(id as LevelId);
                }
                _ => warn!("Dropping unreadable completion entry {entry}"),
            }
        }
        registry
    }
}

/// Durable home of the completion registry.
pub trait RegistryStore {
    fn load(&self) -> CompletionRegistry;
    fn save(&self, registry: &CompletionRegistry) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    path: PathBuf,
}

impl FileRegistryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: crate::app_dirs::AppDirs::registry_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileRegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for FileRegistryStore {
    fn load(&self) -> CompletionRegistry {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CompletionRegistry::new(),
            Err(e) => {
                warn!("Could not read {}: {e}", self.path.display());
                return CompletionRegistry::new();
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(doc) => CompletionRegistry::from_json(&doc),
            Err(e) => {
                warn!("Ignoring corrupt completion record {}: {e}", self.path.display());
                CompletionRegistry::new()
            }
        }
    }

    fn save(&self, registry: &CompletionRegistry) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&registry.to_json())?;
        fs::write(&self.path, data)
    }
}

/// Keeps the document in memory; used by headless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryRegistryStore {
    saved: std::cell::RefCell<Option<Value>>,
}

impl MemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Value) -> Self {
        Self {
            saved: std::cell::RefCell::new(Some(doc)),
        }
    }

    pub fn document(&self) -> Option<Value> {
        self.saved.borrow().clone()
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn load(&self) -> CompletionRegistry {
        self.saved
            .borrow()
            .as_ref()
            .map(CompletionRegistry::from_json)
            .unwrap_or_default()
    }

    fn save(&self, registry: &CompletionRegistry) -> io::Result<()> {
        *self.saved.borrow_mut() = Some(registry.to_json());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_dedupes() {
        let mut registry = CompletionRegistry::new();
        assert!(registry.record(2));
        assert!(!registry.record(2));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_completed(2));
        assert!(!registry.is_completed(3));
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let store = FileRegistryStore::with_path(dir.path().join("progress.json"));
        let mut registry = CompletionRegistry::new();
        registry.record(4);
        registry.record(1);
        store.save(&registry).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, registry);
        assert_eq!(loaded.ids().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("progress.json");
        let store = FileRegistryStore::with_path(&path);
        store.save(&CompletionRegistry::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FileRegistryStore::with_path(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(FileRegistryStore::with_path(&path).load().is_empty());
    }

    #[test]
    fn unreadable_entries_are_dropped() {
        let doc = json!({ NAMESPACE: [1, "two", 3, 3.5, 9, -1, null, 6, 1] });
        let registry = CompletionRegistry::from_json(&doc);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![1, 3, 6]);
    }

    #[test]
    fn wrong_shape_loads_empty() {
        assert!(CompletionRegistry::from_json(&json!([1, 2, 3])).is_empty());
        assert!(CompletionRegistry::from_json(&json!({ NAMESPACE: "1,2" })).is_empty());
    }

    #[test]
    fn stored_document_uses_namespace_key() {
        let store = MemoryRegistryStore::new();
        let mut registry = CompletionRegistry::new();
        registry.record(5);
        store.save(&registry).unwrap();
        assert_eq!(store.document(), Some(json!({ NAMESPACE: [5] })));
        assert_eq!(store.load(), registry);
    }
}
