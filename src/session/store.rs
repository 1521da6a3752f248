//! Session Token Store
//!
//! Persists the opaque session token between runs. The store is the only
//! source of truth for whether a user is logged in; every mutation is a
//! single save or clear call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a session store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persistent storage for the session token
pub trait SessionStore: Send + Sync {
    /// Persist the token, replacing any previous one
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Read the persisted token, if any
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Remove the persisted token. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Token store backed by a single file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Write to a sibling file and rename so readers never see a partial token
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, token).map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process token store, used when nothing should touch the disk
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a consistent Option
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.token"));

        assert_eq!(store.read().unwrap(), None);

        store.save("t1").unwrap();
        assert_eq!(store.read().unwrap(), Some("t1".to_string()));

        store.save("t2").unwrap();
        assert_eq!(store.read().unwrap(), Some("t2".to_string()));
        assert!(!store.path().with_extension("tmp").exists());

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.token"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_blank_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.token");
        std::fs::write(&path, "  \n").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_read_error() {
        let dir = tempdir().unwrap();
        // A directory where the token file should be cannot be read as a string
        let store = FileSessionStore::new(dir.path());
        assert!(matches!(store.read(), Err(StoreError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.token"));
        store.save("secret").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);

        store.save("abc").unwrap();
        assert_eq!(store.read().unwrap(), Some("abc".to_string()));

        let store = MemorySessionStore::with_token("xyz");
        assert_eq!(store.read().unwrap(), Some("xyz".to_string()));
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
