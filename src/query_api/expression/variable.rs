// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/expression/variable.rs

/// Reference to a stream attribute by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub attribute_name: String,
}

impl Variable {
    pub fn new(attribute_name: String) -> Self {
        Self { attribute_name }
    }
}
