// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/error/mod.rs

use crate::core::persistence::state_holder::StateError;

/// Crate-level error type.
///
/// Configuration problems are fatal at construction time — an operator that
/// fails validation never becomes active. State errors surface from the
/// persistence layer during checkpoint or recovery.
#[derive(Debug, thiserror::Error)]
pub enum UnifluxError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown window type '{name}', available: {available:?}")]
    UnknownWindowType {
        name: String,
        available: Vec<String>,
    },

    #[error("no persistence store configured")]
    NoPersistenceStore,

    #[error("no snapshot found for revision '{revision}'")]
    SnapshotNotFound { revision: String },

    #[error(transparent)]
    State(#[from] StateError),
}
