// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/serialization.rs

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a value to the crate's wire format.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, String> {
    bincode::serialize(value).map_err(|e| e.to_string())
}

/// Deserialize a value from the crate's wire format.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    bincode::deserialize(bytes).map_err(|e| e.to_string())
}
