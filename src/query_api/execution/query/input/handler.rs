// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/execution/query/input/handler.rs

use crate::query_api::expression::Expression;

/// Window attachment on an input stream: the window name plus its parameter
/// expressions, exactly as the surrounding query hands them over.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowHandler {
    pub name: String,
    parameters: Vec<Expression>,
}

impl WindowHandler {
    pub fn new(name: impl Into<String>, parameters: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub fn get_parameters(&self) -> &[Expression] {
        &self.parameters
    }
}
