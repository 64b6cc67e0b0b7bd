// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/constant_expression_executor.rs

use super::expression_executor::ExpressionExecutor;
use crate::core::event::complex_event::ComplexEvent;
use crate::core::event::value::AttributeValue;
use crate::query_api::definition::attribute::Type as ApiAttributeType;

/// Executor that returns a fixed value regardless of the event.
#[derive(Debug, Clone)]
pub struct ConstantExpressionExecutor {
    value: AttributeValue,
    return_type: ApiAttributeType,
}

impl ConstantExpressionExecutor {
    pub fn new(value: AttributeValue, return_type: ApiAttributeType) -> Self {
        Self { value, return_type }
    }

    pub fn get_value(&self) -> &AttributeValue {
        &self.value
    }
}

impl ExpressionExecutor for ConstantExpressionExecutor {
    fn execute(&self, _event: Option<&dyn ComplexEvent>) -> Option<AttributeValue> {
        Some(self.value.clone())
    }

    fn get_return_type(&self) -> ApiAttributeType {
        self.return_type
    }

    fn clone_executor(&self) -> Box<dyn ExpressionExecutor> {
        Box::new(self.clone())
    }
}
