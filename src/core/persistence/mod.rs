// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/persistence/mod.rs

pub mod persistence_store;
pub mod snapshot_service;
pub mod state_holder;

pub use self::persistence_store::{
    FilePersistenceStore, InMemoryPersistenceStore, PersistenceStore,
};
pub use self::snapshot_service::SnapshotService;
pub use self::state_holder::{
    ChangeLog, CheckpointId, ComponentId, SchemaVersion, SerializationHints, StateError,
    StateHolder, StateMetadata, StateOperation, StateSnapshot,
};
