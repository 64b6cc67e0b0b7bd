// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/persistence/snapshot_service.rs

use crate::core::error::UnifluxError;
use crate::core::persistence::persistence_store::PersistenceStore;
use crate::core::persistence::state_holder::{
    ComponentId, SerializationHints, StateError, StateHolder, StateSnapshot,
};
use crate::core::util::serialization::{from_bytes, to_bytes};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Coordinates checkpointing across the registered state holders.
///
/// Stateful components register at construction time; `persist` captures all
/// of them into one revision, `restore_revision` pushes a stored revision
/// back into them. Restore is recovery-only and assumes ingestion is not
/// running.
pub struct SnapshotService {
    app_id: String,
    holders: RwLock<HashMap<ComponentId, Arc<Mutex<dyn StateHolder>>>>,
    store: RwLock<Option<Arc<dyn PersistenceStore>>>,
    revision_counter: AtomicU64,
}

impl std::fmt::Debug for SnapshotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotService")
            .field("app_id", &self.app_id)
            .field("holders", &self.holders.read().unwrap().len())
            .finish()
    }
}

impl SnapshotService {
    pub fn new(app_id: String) -> Self {
        Self {
            app_id,
            holders: RwLock::new(HashMap::new()),
            store: RwLock::new(None),
            revision_counter: AtomicU64::new(1),
        }
    }

    pub fn set_persistence_store(&self, store: Arc<dyn PersistenceStore>) {
        *self.store.write().unwrap() = Some(store);
    }

    pub fn register_state_holder(
        &self,
        component_id: ComponentId,
        holder: Arc<Mutex<dyn StateHolder>>,
    ) {
        log::debug!("registering state holder '{component_id}'");
        self.holders.write().unwrap().insert(component_id, holder);
    }

    pub fn deregister_state_holder(&self, component_id: &str) {
        self.holders.write().unwrap().remove(component_id);
    }

    fn next_revision(&self) -> String {
        format!("{:020}", self.revision_counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Capture every registered holder into a new revision. Returns the
    /// revision identifier to restore from later.
    pub fn persist(&self) -> Result<String, UnifluxError> {
        let store = self
            .store
            .read()
            .unwrap()
            .clone()
            .ok_or(UnifluxError::NoPersistenceStore)?;

        let hints = SerializationHints::default();
        let mut snapshots: HashMap<ComponentId, StateSnapshot> = HashMap::new();
        {
            let holders = self.holders.read().unwrap();
            for (component_id, holder) in holders.iter() {
                let snapshot = holder.lock().unwrap().serialize_state(&hints)?;
                snapshots.insert(component_id.clone(), snapshot);
            }
        }

        let payload = to_bytes(&snapshots).map_err(|e| StateError::SerializationError {
            message: format!("failed to encode revision payload: {e}"),
        })?;

        let revision = self.next_revision();
        store.save(&self.app_id, &revision, &payload);
        log::debug!(
            "persisted revision '{revision}' ({} component(s), {} bytes)",
            snapshots.len(),
            payload.len()
        );
        Ok(revision)
    }

    /// Restore all registered holders from the given revision. Every
    /// registered holder must be present in the revision; anything less is a
    /// fatal recovery error.
    pub fn restore_revision(&self, revision: &str) -> Result<(), UnifluxError> {
        let store = self
            .store
            .read()
            .unwrap()
            .clone()
            .ok_or(UnifluxError::NoPersistenceStore)?;

        let payload =
            store
                .load(&self.app_id, revision)
                .ok_or_else(|| UnifluxError::SnapshotNotFound {
                    revision: revision.to_string(),
                })?;

        let snapshots: HashMap<ComponentId, StateSnapshot> =
            from_bytes(&payload).map_err(|e| StateError::DeserializationError {
                message: format!("failed to decode revision payload: {e}"),
            })?;

        let holders = self.holders.read().unwrap();
        for (component_id, holder) in holders.iter() {
            let snapshot =
                snapshots
                    .get(component_id)
                    .ok_or_else(|| StateError::InvalidStateData {
                        message: format!(
                            "revision '{revision}' has no state for component '{component_id}'"
                        ),
                    })?;
            holder.lock().unwrap().deserialize_state(snapshot)?;
        }
        log::debug!("restored revision '{revision}'");
        Ok(())
    }

    /// Restore the newest stored revision, if any.
    pub fn restore_last_revision(&self) -> Result<Option<String>, UnifluxError> {
        let last = {
            let store = self
                .store
                .read()
                .unwrap()
                .clone()
                .ok_or(UnifluxError::NoPersistenceStore)?;
            store.get_last_revision(&self.app_id)
        };
        match last {
            Some(revision) => {
                self.restore_revision(&revision)?;
                Ok(Some(revision))
            }
            None => Ok(None),
        }
    }
}
