// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/expression_executor.rs

use crate::core::event::complex_event::ComplexEvent;
use crate::core::event::value::AttributeValue;
use crate::query_api::definition::attribute::Type as ApiAttributeType;
use std::fmt::Debug;

/// A compiled expression that can be evaluated against an event.
///
/// `event` is optional because constants evaluate without one; `None` as the
/// result represents SQL-style null (missing attribute, failed lookup).
pub trait ExpressionExecutor: Debug + Send + Sync + 'static {
    fn execute(&self, event: Option<&dyn ComplexEvent>) -> Option<AttributeValue>;

    fn get_return_type(&self) -> ApiAttributeType;

    fn clone_executor(&self) -> Box<dyn ExpressionExecutor>;

    /// True for executors that read event attributes. Window key parameters
    /// are validated with this: a key must be an attribute, not a constant.
    fn is_variable_executor(&self) -> bool {
        false
    }
}
