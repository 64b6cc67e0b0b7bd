// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/persistence/state_holder.rs

//! State management surface for checkpointable components.
//!
//! A component exposes its durable state through [`StateHolder`]: full
//! snapshots for checkpoint/recovery, plus an incremental change log so a
//! checkpoint coordinator can ship deltas between full snapshots.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a checkpoint.
pub type CheckpointId = u64;

/// Unique identifier for a state component.
pub type ComponentId = String;

/// Version of a component's state schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SchemaVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Same major, equal-or-newer minor reads older snapshots.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Hints a checkpoint coordinator can pass to serialization.
#[derive(Debug, Clone, Default)]
pub struct SerializationHints {
    pub target_chunk_size: Option<usize>,
}

/// Metadata attached to every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMetadata {
    pub component_id: ComponentId,
    pub component_type: String,
    pub created_at: u64,
    pub custom_metadata: HashMap<String, String>,
}

impl StateMetadata {
    pub fn new(component_id: ComponentId, component_type: String) -> Self {
        Self {
            component_id,
            component_type,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            custom_metadata: HashMap::new(),
        }
    }
}

/// A full state snapshot with integrity checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: SchemaVersion,
    pub checkpoint_id: CheckpointId,
    pub data: Vec<u8>,
    pub checksum: u64,
    pub metadata: StateMetadata,
}

impl StateSnapshot {
    pub fn calculate_checksum(data: &[u8]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        hasher.finish()
    }

    pub fn verify_integrity(&self) -> bool {
        Self::calculate_checksum(&self.data) == self.checksum
    }
}

/// One logical mutation of a component's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StateOperation {
    Insert {
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Update {
        key: Vec<u8>,
        old_value: Vec<u8>,
        new_value: Vec<u8>,
    },
    Delete {
        key: Vec<u8>,
        old_value: Vec<u8>,
    },
    Clear,
}

/// Ordered mutations between two checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLog {
    pub from_checkpoint: CheckpointId,
    pub to_checkpoint: CheckpointId,
    pub operations: Vec<StateOperation>,
    pub size_bytes: usize,
}

impl ChangeLog {
    pub fn new(from: CheckpointId, to: CheckpointId) -> Self {
        Self {
            from_checkpoint: from,
            to_checkpoint: to,
            operations: Vec::new(),
            size_bytes: 0,
        }
    }

    pub fn add_operation(&mut self, operation: StateOperation) {
        let op_size = match &operation {
            StateOperation::Insert { key, value } => key.len() + value.len(),
            StateOperation::Update {
                key,
                old_value,
                new_value,
            } => key.len() + old_value.len() + new_value.len(),
            StateOperation::Delete { key, old_value } => key.len() + old_value.len(),
            StateOperation::Clear => 0,
        };
        self.size_bytes += op_size;
        self.operations.push(operation);
    }
}

/// Checkpointable state surface.
pub trait StateHolder: Send + Sync {
    fn schema_version(&self) -> SchemaVersion;

    fn serialize_state(&self, hints: &SerializationHints) -> Result<StateSnapshot, StateError>;

    /// Replace the component's state wholesale from a snapshot. Never
    /// composes with concurrent ingestion; partial application is forbidden.
    fn deserialize_state(&self, snapshot: &StateSnapshot) -> Result<(), StateError>;

    fn get_changelog(&self, since: CheckpointId) -> Result<ChangeLog, StateError>;

    fn apply_changelog(&self, changes: &ChangeLog) -> Result<(), StateError>;

    fn component_metadata(&self) -> StateMetadata;

    fn can_migrate_from(&self, version: &SchemaVersion) -> bool {
        self.schema_version().is_compatible_with(version)
    }
}

/// State management errors.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("serialization failed: {message}")]
    SerializationError { message: String },

    #[error("deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("incompatible schema version: current {current}, required {required}")]
    IncompatibleVersion {
        current: SchemaVersion,
        required: SchemaVersion,
    },

    #[error("checkpoint {checkpoint_id} not found")]
    CheckpointNotFound { checkpoint_id: CheckpointId },

    #[error("invalid state data: {message}")]
    InvalidStateData { message: String },

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error("IO error: {message}")]
    IoError { message: String },
}
