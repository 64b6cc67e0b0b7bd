// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/persistence/persistence_store.rs

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Revisioned byte storage for application snapshots.
///
/// The snapshot service owns what the bytes mean; the store only keeps them
/// addressable by `(app_id, revision)` and remembers the latest revision per
/// application.
pub trait PersistenceStore: Debug + Send + Sync {
    fn save(&self, app_id: &str, revision: &str, snapshot: &[u8]);
    fn load(&self, app_id: &str, revision: &str) -> Option<Vec<u8>>;
    fn get_last_revision(&self, app_id: &str) -> Option<String>;
    fn clear_all_revisions(&self, app_id: &str);
}

/// Keeps snapshots in process memory. Suited for tests and for deployments
/// that only need crash-free operator restarts.
#[derive(Debug, Default)]
pub struct InMemoryPersistenceStore {
    // app_id -> ordered (revision, bytes) pairs, newest last
    snapshots: Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>,
}

impl InMemoryPersistenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for InMemoryPersistenceStore {
    fn save(&self, app_id: &str, revision: &str, snapshot: &[u8]) {
        let mut map = self.snapshots.lock().unwrap();
        map.entry(app_id.to_string())
            .or_default()
            .push((revision.to_string(), snapshot.to_vec()));
    }

    fn load(&self, app_id: &str, revision: &str) -> Option<Vec<u8>> {
        let map = self.snapshots.lock().unwrap();
        map.get(app_id)?
            .iter()
            .rev()
            .find(|(rev, _)| rev == revision)
            .map(|(_, bytes)| bytes.clone())
    }

    fn get_last_revision(&self, app_id: &str) -> Option<String> {
        let map = self.snapshots.lock().unwrap();
        map.get(app_id)?.last().map(|(rev, _)| rev.clone())
    }

    fn clear_all_revisions(&self, app_id: &str) {
        self.snapshots.lock().unwrap().remove(app_id);
    }
}

/// Stores each revision as a file under `<base_dir>/<app_id>/<revision>`.
#[derive(Debug)]
pub struct FilePersistenceStore {
    base_dir: PathBuf,
}

impl FilePersistenceStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn app_dir(&self, app_id: &str) -> PathBuf {
        self.base_dir.join(app_id)
    }
}

impl PersistenceStore for FilePersistenceStore {
    fn save(&self, app_id: &str, revision: &str, snapshot: &[u8]) {
        let dir = self.app_dir(app_id);
        if let Err(e) = fs::create_dir_all(&dir) {
            log::error!("failed to create snapshot dir {}: {e}", dir.display());
            return;
        }
        let path = dir.join(revision);
        if let Err(e) = fs::write(&path, snapshot) {
            log::error!("failed to write snapshot {}: {e}", path.display());
        }
    }

    fn load(&self, app_id: &str, revision: &str) -> Option<Vec<u8>> {
        fs::read(self.app_dir(app_id).join(revision)).ok()
    }

    fn get_last_revision(&self, app_id: &str) -> Option<String> {
        // Revision names sort lexicographically because they are
        // zero-padded counters (see SnapshotService::next_revision).
        let mut revisions: Vec<String> = fs::read_dir(self.app_dir(app_id))
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        revisions.sort();
        revisions.pop()
    }

    fn clear_all_revisions(&self, app_id: &str) {
        let dir = self.app_dir(app_id);
        if dir.exists() {
            if let Err(e) = fs::remove_dir_all(&dir) {
                log::error!("failed to clear snapshots {}: {e}", dir.display());
            }
        }
    }
}
