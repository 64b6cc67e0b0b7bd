// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/processor/stream/window/unique_time_batch_window_state_holder.rs

//! StateHolder implementation for [`UniqueTimeBatchWindowProcessor`].
//!
//! Serializes the four durable state fields — current batch, pending expiry,
//! latest-by-key map, reset marker — and tracks incremental operations so a
//! checkpoint coordinator can ship deltas between full snapshots.
//!
//! [`UniqueTimeBatchWindowProcessor`]: super::UniqueTimeBatchWindowProcessor

use dashmap::DashMap;
use std::sync::{Arc, Mutex};

use crate::core::event::stream::stream_event::StreamEvent;
use crate::core::persistence::state_holder::{
    ChangeLog, CheckpointId, SchemaVersion, SerializationHints, StateError, StateHolder,
    StateMetadata, StateOperation, StateSnapshot,
};
use crate::core::util::serialization::{from_bytes, to_bytes};

use super::unique_time_batch_window_processor::WindowState;

const CURRENT_BATCH_KEY_PREFIX: &[u8] = b"current_batch_";
const MAP_KEY_PREFIX: &[u8] = b"map_";
const RESET_EVENT_KEY: &[u8] = b"reset_event";
const FLUSH_MARKER_KEY: &[u8] = b"flush_marker";

/// Shared-handle state holder: it aliases the processor's own state so a
/// snapshot is always of the live window.
#[derive(Debug, Clone)]
pub struct UniqueTimeBatchWindowStateHolder {
    state: Arc<Mutex<WindowState>>,
    latest_by_key: Arc<DashMap<String, StreamEvent>>,
    component_id: String,
    window_ms: i64,
    last_checkpoint_id: Arc<Mutex<Option<CheckpointId>>>,
    change_log: Arc<Mutex<Vec<StateOperation>>>,
}

/// Serializable snapshot payload.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct UniqueTimeBatchWindowStateData {
    current_batch: Vec<StreamEvent>,
    pending_expiry: Vec<StreamEvent>,
    latest_by_key: Vec<(String, StreamEvent)>,
    reset_event: Option<StreamEvent>,
}

impl UniqueTimeBatchWindowStateHolder {
    pub(super) fn new(
        state: Arc<Mutex<WindowState>>,
        latest_by_key: Arc<DashMap<String, StreamEvent>>,
        component_id: String,
        window_ms: i64,
    ) -> Self {
        Self {
            state,
            latest_by_key,
            component_id,
            window_ms,
            last_checkpoint_id: Arc::new(Mutex::new(None)),
            change_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record an event appended to the current batch.
    pub fn record_event_added(&self, event: &StreamEvent) {
        let mut key = CURRENT_BATCH_KEY_PREFIX.to_vec();
        key.extend_from_slice(&event.timestamp.to_le_bytes());
        self.change_log.lock().unwrap().push(StateOperation::Insert {
            key,
            value: to_bytes(event).unwrap_or_default(),
        });
    }

    /// Record a latest-by-key replacement. `old` is `None` for a new key.
    pub fn record_key_replaced(&self, map_key: &str, old: Option<&StreamEvent>) {
        let mut key = MAP_KEY_PREFIX.to_vec();
        key.extend_from_slice(map_key.as_bytes());
        let new_value = self
            .latest_by_key
            .get(map_key)
            .map(|entry| to_bytes(entry.value()).unwrap_or_default())
            .unwrap_or_default();
        let operation = match old {
            Some(old) => StateOperation::Update {
                key,
                old_value: to_bytes(old).unwrap_or_default(),
                new_value,
            },
            None => StateOperation::Insert {
                key,
                value: new_value,
            },
        };
        self.change_log.lock().unwrap().push(operation);
    }

    /// Record a completed flush transition.
    pub fn record_batch_flushed(
        &self,
        current_batch: &[StreamEvent],
        expired_batch: &[StreamEvent],
        timestamp: i64,
    ) {
        let transition = (
            current_batch.len(),
            expired_batch.len(),
            timestamp,
            self.window_ms,
        );
        self.change_log.lock().unwrap().push(StateOperation::Delete {
            key: FLUSH_MARKER_KEY.to_vec(),
            old_value: to_bytes(&transition).unwrap_or_default(),
        });
    }

    /// Record rotation of the reset marker.
    pub fn record_reset_event_set(&self, event: &StreamEvent) {
        self.change_log.lock().unwrap().push(StateOperation::Insert {
            key: RESET_EVENT_KEY.to_vec(),
            value: to_bytes(event).unwrap_or_default(),
        });
    }

    /// Forget recorded operations once a checkpoint has them.
    pub fn clear_change_log(&self, checkpoint_id: CheckpointId) {
        self.change_log.lock().unwrap().clear();
        *self.last_checkpoint_id.lock().unwrap() = Some(checkpoint_id);
    }

    fn decode_event(&self, bytes: &[u8]) -> Result<StreamEvent, StateError> {
        from_bytes(bytes).map_err(|e| StateError::DeserializationError {
            message: format!("failed to decode event: {e}"),
        })
    }
}

impl StateHolder for UniqueTimeBatchWindowStateHolder {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::new(1, 0, 0)
    }

    fn serialize_state(&self, _hints: &SerializationHints) -> Result<StateSnapshot, StateError> {
        // The state lock is held only long enough to copy the vectors.
        let (current_batch, pending_expiry, reset_event) = {
            let state = self.state.lock().unwrap();
            (
                state.current_batch.clone(),
                state.pending_expiry.clone(),
                state.reset_event.clone(),
            )
        };
        let latest_by_key: Vec<(String, StreamEvent)> = self
            .latest_by_key
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone_without_next()))
            .collect();

        let state_data = UniqueTimeBatchWindowStateData {
            current_batch,
            pending_expiry,
            latest_by_key,
            reset_event,
        };

        let data = to_bytes(&state_data).map_err(|e| StateError::SerializationError {
            message: format!("failed to serialize unique time batch window state: {e}"),
        })?;
        let checksum = StateSnapshot::calculate_checksum(&data);

        Ok(StateSnapshot {
            version: self.schema_version(),
            checkpoint_id: 0,
            data,
            checksum,
            metadata: self.component_metadata(),
        })
    }

    fn deserialize_state(&self, snapshot: &StateSnapshot) -> Result<(), StateError> {
        if !snapshot.verify_integrity() {
            return Err(StateError::ChecksumMismatch);
        }
        if !self.can_migrate_from(&snapshot.version) {
            return Err(StateError::IncompatibleVersion {
                current: self.schema_version(),
                required: snapshot.version,
            });
        }

        let state_data: UniqueTimeBatchWindowStateData =
            from_bytes(&snapshot.data).map_err(|e| StateError::DeserializationError {
                message: format!("failed to deserialize unique time batch window state: {e}"),
            })?;

        // Wholesale replacement; recovery never merges.
        {
            let mut state = self.state.lock().unwrap();
            state.current_batch = state_data.current_batch;
            state.pending_expiry = state_data.pending_expiry;
            state.reset_event = state_data.reset_event;
            // The emission boundary is wall-clock anchored and re-derived
            // lazily on the first invocation after recovery.
            state.next_emit_time = None;
        }
        self.latest_by_key.clear();
        for (key, event) in state_data.latest_by_key {
            self.latest_by_key.insert(key, event);
        }
        Ok(())
    }

    fn get_changelog(&self, since: CheckpointId) -> Result<ChangeLog, StateError> {
        if let Some(last_id) = *self.last_checkpoint_id.lock().unwrap() {
            if since > last_id {
                return Err(StateError::CheckpointNotFound {
                    checkpoint_id: since,
                });
            }
        }
        let mut changelog = ChangeLog::new(since, since + 1);
        for operation in self.change_log.lock().unwrap().iter() {
            changelog.add_operation(operation.clone());
        }
        Ok(changelog)
    }

    fn apply_changelog(&self, changes: &ChangeLog) -> Result<(), StateError> {
        let mut state = self.state.lock().unwrap();
        for operation in &changes.operations {
            match operation {
                StateOperation::Insert { key, value } => {
                    if key.as_slice() == RESET_EVENT_KEY {
                        state.reset_event = Some(self.decode_event(value)?);
                    } else if key.starts_with(MAP_KEY_PREFIX) {
                        let map_key = String::from_utf8_lossy(&key[MAP_KEY_PREFIX.len()..])
                            .into_owned();
                        self.latest_by_key.insert(map_key, self.decode_event(value)?);
                    } else {
                        state.current_batch.push(self.decode_event(value)?);
                    }
                }
                StateOperation::Update { key, new_value, .. } => {
                    if key.starts_with(MAP_KEY_PREFIX) {
                        let map_key = String::from_utf8_lossy(&key[MAP_KEY_PREFIX.len()..])
                            .into_owned();
                        self.latest_by_key.insert(map_key, self.decode_event(new_value)?);
                    }
                }
                StateOperation::Delete { key, .. } => {
                    if key.as_slice() == FLUSH_MARKER_KEY {
                        // Replay the batch rotation: the flushed batch
                        // becomes the next generation's expiry candidates.
                        let batch = std::mem::take(&mut state.current_batch);
                        state.pending_expiry = batch
                            .into_iter()
                            .map(|mut event| {
                                event.event_type =
                                    crate::core::event::complex_event::ComplexEventType::Expired;
                                event
                            })
                            .collect();
                    } else if key.as_slice() == RESET_EVENT_KEY {
                        state.reset_event = None;
                    }
                }
                StateOperation::Clear => {
                    state.current_batch.clear();
                    state.pending_expiry.clear();
                    state.reset_event = None;
                    self.latest_by_key.clear();
                }
            }
        }
        Ok(())
    }

    fn component_metadata(&self) -> StateMetadata {
        let mut metadata = StateMetadata::new(
            self.component_id.clone(),
            "UniqueTimeBatchWindowProcessor".to_string(),
        );
        metadata
            .custom_metadata
            .insert("window_ms".to_string(), self.window_ms.to_string());
        metadata
            .custom_metadata
            .insert("window_type".to_string(), "uniqueTimeBatch".to_string());
        let state = self.state.lock().unwrap();
        metadata.custom_metadata.insert(
            "current_batch_size".to_string(),
            state.current_batch.len().to_string(),
        );
        metadata.custom_metadata.insert(
            "pending_expiry_size".to_string(),
            state.pending_expiry.len().to_string(),
        );
        metadata.custom_metadata.insert(
            "retained_keys".to_string(),
            self.latest_by_key.len().to_string(),
        );
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::complex_event::ComplexEventType;
    use crate::core::event::value::AttributeValue;

    fn holder_with_state() -> (
        UniqueTimeBatchWindowStateHolder,
        Arc<Mutex<WindowState>>,
        Arc<DashMap<String, StreamEvent>>,
    ) {
        let state = Arc::new(Mutex::new(WindowState::default()));
        let map = Arc::new(DashMap::new());
        let holder = UniqueTimeBatchWindowStateHolder::new(
            Arc::clone(&state),
            Arc::clone(&map),
            "test_unique_time_batch_window".to_string(),
            1000,
        );
        (holder, state, map)
    }

    fn event(timestamp: i64, symbol: &str) -> StreamEvent {
        StreamEvent::new_with_data(
            timestamp,
            vec![AttributeValue::String(symbol.to_string())],
        )
    }

    #[test]
    fn snapshot_round_trips_all_fields() {
        let (holder, state, map) = holder_with_state();
        {
            let mut st = state.lock().unwrap();
            st.current_batch.push(event(100, "A"));
            let mut pending = event(100, "A");
            pending.event_type = ComplexEventType::Expired;
            st.pending_expiry.push(pending);
            let mut reset = event(100, "A");
            reset.event_type = ComplexEventType::Reset;
            st.reset_event = Some(reset);
            st.next_emit_time = Some(1000);
        }
        map.insert("A".to_string(), {
            let mut e = event(100, "A");
            e.event_type = ComplexEventType::Expired;
            e
        });

        let snapshot = holder
            .serialize_state(&SerializationHints::default())
            .unwrap();
        assert!(snapshot.verify_integrity());

        // Wipe, restore, verify.
        {
            let mut st = state.lock().unwrap();
            *st = WindowState::default();
        }
        map.clear();
        holder.deserialize_state(&snapshot).unwrap();

        let st = state.lock().unwrap();
        assert_eq!(st.current_batch.len(), 1);
        assert_eq!(st.pending_expiry.len(), 1);
        assert!(st.reset_event.is_some());
        // The boundary is re-derived after recovery, never restored.
        assert_eq!(st.next_emit_time, None);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("A"));
    }

    #[test]
    fn corrupted_snapshot_is_fatal() {
        let (holder, _state, _map) = holder_with_state();
        let mut snapshot = holder
            .serialize_state(&SerializationHints::default())
            .unwrap();
        snapshot.data.push(0xFF);
        assert!(matches!(
            holder.deserialize_state(&snapshot),
            Err(StateError::ChecksumMismatch)
        ));
    }

    #[test]
    fn truncated_payload_is_fatal() {
        let (holder, _state, _map) = holder_with_state();
        let mut snapshot = holder
            .serialize_state(&SerializationHints::default())
            .unwrap();
        snapshot.data.truncate(snapshot.data.len() / 2);
        snapshot.checksum = StateSnapshot::calculate_checksum(&snapshot.data);
        assert!(matches!(
            holder.deserialize_state(&snapshot),
            Err(StateError::DeserializationError { .. })
        ));
    }

    #[test]
    fn changelog_replays_ingest_and_flush() {
        let (holder, state, map) = holder_with_state();

        holder.record_event_added(&event(100, "A"));
        map.insert("A".to_string(), {
            let mut e = event(100, "A");
            e.event_type = ComplexEventType::Expired;
            e
        });
        holder.record_key_replaced("A", None);
        holder.record_batch_flushed(&[event(100, "A")], &[], 1000);

        let changelog = holder.get_changelog(0).unwrap();
        assert_eq!(changelog.operations.len(), 3);

        // Replay into a fresh holder.
        let (replica, replica_state, replica_map) = holder_with_state();
        replica.apply_changelog(&changelog).unwrap();

        let st = replica_state.lock().unwrap();
        assert!(st.current_batch.is_empty());
        assert_eq!(st.pending_expiry.len(), 1);
        assert_eq!(st.pending_expiry[0].event_type, ComplexEventType::Expired);
        assert_eq!(replica_map.len(), 1);
        let _ = state;
    }

    #[test]
    fn clearing_changelog_advances_checkpoint() {
        let (holder, _state, _map) = holder_with_state();
        holder.record_event_added(&event(1, "A"));
        holder.clear_change_log(5);
        assert!(holder.get_changelog(0).unwrap().operations.is_empty());
        assert!(matches!(
            holder.get_changelog(9),
            Err(StateError::CheckpointNotFound { checkpoint_id: 9 })
        ));
    }
}
