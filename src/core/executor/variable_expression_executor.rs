// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/variable_expression_executor.rs

use crate::core::event::complex_event::ComplexEvent;
use crate::core::event::stream::stream_event::StreamEvent;
use crate::core::event::value::AttributeValue;
use crate::core::executor::expression_executor::ExpressionExecutor;
use crate::core::util::uniflux_constants::{
    BEFORE_WINDOW_DATA_INDEX, STREAM_ATTRIBUTE_INDEX_IN_TYPE,
};
use crate::query_api::definition::attribute::Type as ApiAttributeType;

/// Executor that retrieves an attribute's value from an event.
///
/// The position array follows the engine convention:
/// `position[STREAM_ATTRIBUTE_TYPE_INDEX]` selects the data section and
/// `position[STREAM_ATTRIBUTE_INDEX_IN_TYPE]` the index within it. The first
/// two slots identify the event within a multi-stream chain and are always
/// zero for single-stream windows.
#[derive(Debug, Clone)]
pub struct VariableExpressionExecutor {
    pub position: [i32; 4],
    pub return_type: ApiAttributeType,
    pub attribute_name: String,
}

impl VariableExpressionExecutor {
    pub fn new(position: [i32; 4], return_type: ApiAttributeType, attribute_name: String) -> Self {
        Self {
            position,
            return_type,
            attribute_name,
        }
    }

    /// Executor addressing `before_window_data[attribute_index]`.
    pub fn for_stream_attribute(
        attribute_index: usize,
        return_type: ApiAttributeType,
        attribute_name: String,
    ) -> Self {
        Self::new(
            [0, 0, BEFORE_WINDOW_DATA_INDEX as i32, attribute_index as i32],
            return_type,
            attribute_name,
        )
    }

    pub fn get_position(&self) -> [i32; 4] {
        self.position
    }
}

impl ExpressionExecutor for VariableExpressionExecutor {
    fn execute(&self, event_opt: Option<&dyn ComplexEvent>) -> Option<AttributeValue> {
        let complex_event = event_opt?;

        if let Some(stream_event) = complex_event.as_any().downcast_ref::<StreamEvent>() {
            return stream_event
                .get_attribute_by_position(&self.position)
                .cloned();
        }

        // Non-StreamEvent implementors expose only output data.
        complex_event
            .get_output_data()
            .and_then(|d| d.get(self.position[STREAM_ATTRIBUTE_INDEX_IN_TYPE] as usize))
            .cloned()
    }

    fn get_return_type(&self) -> ApiAttributeType {
        self.return_type
    }

    fn clone_executor(&self) -> Box<dyn ExpressionExecutor> {
        Box::new(self.clone())
    }

    fn is_variable_executor(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_stream_attribute_by_position() {
        let exec = VariableExpressionExecutor::for_stream_attribute(
            1,
            ApiAttributeType::INT,
            "volume".to_string(),
        );
        let event = StreamEvent::new_with_data(
            0,
            vec![
                AttributeValue::String("IBM".to_string()),
                AttributeValue::Int(500),
            ],
        );
        let result = exec.execute(Some(&event as &dyn ComplexEvent));
        assert_eq!(result, Some(AttributeValue::Int(500)));
        assert!(exec.is_variable_executor());
    }

    #[test]
    fn out_of_bounds_is_null() {
        let exec = VariableExpressionExecutor::for_stream_attribute(
            3,
            ApiAttributeType::INT,
            "missing".to_string(),
        );
        let event = StreamEvent::new_with_data(0, vec![AttributeValue::Int(1)]);
        assert_eq!(exec.execute(Some(&event as &dyn ComplexEvent)), None);
    }

    #[test]
    fn no_event_is_null() {
        let exec = VariableExpressionExecutor::for_stream_attribute(
            0,
            ApiAttributeType::STRING,
            "symbol".to_string(),
        );
        assert_eq!(exec.execute(None), None);
    }
}
