//! Session state for the inventory console
//!
//! Replaces ambient browser storage with an explicit object. Two durable keys
//! matter to the inventory page:
//! - `isImport`: one-shot marker left by the import flow (`"true"` or absent)
//! - `currentUser`: JSON record used for role gating

use serde_json::{Map, Value};
use shared::CurrentUser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};

pub const IMPORT_FLAG_KEY: &str = "isImport";
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key/value storage backing a [`Session`]
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| AppError::Session("memory store lock poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Durable store: a flat JSON object of string values on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> AppResult<Map<String, Value>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(AppError::Session(format!("{}: {}", self.path.display(), e))),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::Session(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(AppError::Session(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> AppResult<()> {
        let text = serde_json::to_string_pretty(map)
            .map_err(|e| AppError::Session(e.to_string()))?;
        std::fs::write(&self.path, text)
            .map_err(|e| AppError::Session(format!("{}: {}", self.path.display(), e)))
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| AppError::Session("file store lock poisoned".to_string()))?;
        f()
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.with_lock(|| {
            Ok(self.read()?.get(key).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
        })
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.with_lock(|| {
            let mut map = self.read()?;
            map.insert(key.to_string(), Value::String(value.to_string()));
            self.write(&map)
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.with_lock(|| {
            let mut map = self.read()?;
            if map.remove(key).is_some() {
                self.write(&map)?;
            }
            Ok(())
        })
    }
}

/// Typed access to the session keys the inventory page uses
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Signed-in user; a missing or unreadable record counts as signed out
    pub fn current_user(&self) -> Option<CurrentUser> {
        let raw = match self.store.get(CURRENT_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read current user: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable current user record: {}", e);
                None
            }
        }
    }

    pub fn set_current_user(&self, user: &CurrentUser) -> AppResult<()> {
        let raw = serde_json::to_string(user).map_err(|e| AppError::Session(e.to_string()))?;
        self.store.set(CURRENT_USER_KEY, &raw)
    }

    /// Called by the import flow once a file has been accepted
    pub fn mark_import(&self) -> AppResult<()> {
        self.store.set(IMPORT_FLAG_KEY, "true")
    }

    pub fn is_import_pending(&self) -> AppResult<bool> {
        Ok(self.store.get(IMPORT_FLAG_KEY)?.as_deref() == Some("true"))
    }

    pub fn clear_import_flag(&self) -> AppResult<()> {
        self.store.remove(IMPORT_FLAG_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_flag_lifecycle() {
        let session = Session::in_memory();
        assert!(!session.is_import_pending().unwrap());

        session.mark_import().unwrap();
        assert!(session.is_import_pending().unwrap());

        session.clear_import_flag().unwrap();
        assert!(!session.is_import_pending().unwrap());
    }

    #[test]
    fn test_only_literal_true_counts() {
        let store = Arc::new(MemoryStore::default());
        store.set(IMPORT_FLAG_KEY, "TRUE").unwrap();
        let session = Session::new(store);
        assert!(!session.is_import_pending().unwrap());
    }

    #[test]
    fn test_current_user_round_trip() {
        let session = Session::in_memory();
        assert_eq!(session.current_user(), None);

        let user = CurrentUser {
            user_id: Some(12),
            roles: vec![6, 8],
        };
        session.set_current_user(&user).unwrap();
        assert_eq!(session.current_user(), Some(user));
    }

    #[test]
    fn test_garbage_user_record_is_signed_out() {
        let store = Arc::new(MemoryStore::default());
        store.set(CURRENT_USER_KEY, "{not json").unwrap();
        assert_eq!(Session::new(store).current_user(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = Session::new(Arc::new(FileStore::new(&path)));
        first.mark_import().unwrap();
        first
            .set_current_user(&CurrentUser {
                user_id: Some(3),
                roles: vec![6],
            })
            .unwrap();

        let second = Session::new(Arc::new(FileStore::new(&path)));
        assert!(second.is_import_pending().unwrap());
        assert_eq!(second.current_user().unwrap().roles, vec![6]);

        second.clear_import_flag().unwrap();
        let third = Session::new(Arc::new(FileStore::new(&path)));
        assert!(!third.is_import_pending().unwrap());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(IMPORT_FLAG_KEY).unwrap(), None);
        store.remove(IMPORT_FLAG_KEY).unwrap();
        assert!(!store.path().exists());
    }
}
