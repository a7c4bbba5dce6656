// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session snapshot storage.
//!
//! One named entry holding the serialized snapshot. The store loads it once
//! at construction and saves it on every mutating operation, so the
//! persistence boundary is a visible pair of calls rather than implicit
//! middleware.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::AuthError;
use crate::models::SessionSnapshot;

/// Persisted storage for the session snapshot.
pub struct SnapshotStore {
    backend: Backend,
}

enum Backend {
    File(PathBuf),
    Memory(Mutex<Option<SessionSnapshot>>),
}

impl SnapshotStore {
    /// File-backed store at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
        }
    }

    /// Create an in-memory store for testing (no filesystem access).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(None)),
        }
    }

    /// Load the last persisted snapshot. A missing entry is `Ok(None)`.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, AuthError> {
        match &self.backend {
            Backend::Memory(slot) => Ok(slot.lock().expect("snapshot lock poisoned").clone()),
            Backend::File(path) => {
                let raw = match fs::read_to_string(path) {
                    Ok(raw) => raw,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                    Err(e) => {
                        return Err(AuthError::Storage(format!(
                            "read {}: {}",
                            path.display(),
                            e
                        )))
                    }
                };

                let snapshot = serde_json::from_str(&raw).map_err(|e| {
                    AuthError::Storage(format!("parse {}: {}", path.display(), e))
                })?;
                Ok(Some(snapshot))
            }
        }
    }

    /// Persist a snapshot, replacing the previous entry.
    ///
    /// File writes go through a temp file and an atomic rename so another
    /// reader never observes a torn entry.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), AuthError> {
        match &self.backend {
            Backend::Memory(slot) => {
                *slot.lock().expect("snapshot lock poisoned") = Some(snapshot.clone());
                Ok(())
            }
            Backend::File(path) => {
                let raw = serde_json::to_string_pretty(snapshot)
                    .map_err(|e| AuthError::Storage(format!("serialize snapshot: {}", e)))?;

                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, raw)
                    .map_err(|e| AuthError::Storage(format!("write {}: {}", tmp.display(), e)))?;
                fs::rename(&tmp, path).map_err(|e| {
                    AuthError::Storage(format!("rename into {}: {}", path.display(), e))
                })?;

                tracing::debug!(path = %path.display(), "Session snapshot saved");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_round_trip() {
        let store = SnapshotStore::new_mock();
        assert!(store.load().unwrap().is_none());

        let snapshot = SessionSnapshot::anonymous();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("auth-storage.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth-storage.json");
        fs::write(&path, "not json").unwrap();

        let store = SnapshotStore::open(&path);
        assert!(matches!(store.load(), Err(AuthError::Storage(_))));
    }
}
