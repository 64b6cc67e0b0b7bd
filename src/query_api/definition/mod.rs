// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/definition/mod.rs

pub mod attribute;
pub mod stream_definition;

pub use self::attribute::{Attribute, Type};
pub use self::stream_definition::StreamDefinition;
