// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/definition/attribute.rs

use serde::{Deserialize, Serialize};

/// Data type of a stream attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
pub enum Type {
    STRING,
    INT,
    LONG,
    FLOAT,
    DOUBLE,
    BOOL,
    OBJECT,
}

/// A named, typed attribute within a stream definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    attribute_type: Type,
}

impl Attribute {
    pub fn new(name: String, attribute_type: Type) -> Self {
        Self {
            name,
            attribute_type,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> Type {
        self.attribute_type
    }
}
