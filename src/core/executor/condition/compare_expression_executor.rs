// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/condition/compare_expression_executor.rs

use crate::core::event::complex_event::ComplexEvent;
use crate::core::event::value::AttributeValue;
use crate::core::executor::expression_executor::ExpressionExecutor;
use crate::query_api::definition::attribute::Type as ApiAttributeType;
use crate::query_api::expression::CompareOperator;

/// Evaluates a binary comparison to BOOL.
///
/// The comparison domain is fixed at construction from the operand return
/// types: numeric pairs widen to the larger type, STRING compares with
/// STRING only, BOOL supports equality only. Null on either side yields
/// `false` except for `!=`, which yields `true`.
#[derive(Debug)]
pub struct CompareExpressionExecutor {
    left_executor: Box<dyn ExpressionExecutor>,
    right_executor: Box<dyn ExpressionExecutor>,
    operator: CompareOperator,
    cmp_type: ComparisonType,
}

#[derive(Debug, Clone, Copy)]
enum ComparisonType {
    Long,
    Double,
    Bool,
    String,
}

fn as_i64(val: &AttributeValue) -> Option<i64> {
    match val {
        AttributeValue::Int(v) => Some(*v as i64),
        AttributeValue::Long(v) => Some(*v),
        _ => None,
    }
}

fn compare_ord<T: Ord>(l: &T, r: &T, op: CompareOperator) -> bool {
    match op {
        CompareOperator::Equal => l == r,
        CompareOperator::NotEqual => l != r,
        CompareOperator::GreaterThan => l > r,
        CompareOperator::GreaterThanEqual => l >= r,
        CompareOperator::LessThan => l < r,
        CompareOperator::LessThanEqual => l <= r,
    }
}

fn compare_f64(l: f64, r: f64, op: CompareOperator) -> bool {
    match op {
        CompareOperator::Equal => (l - r).abs() < f64::EPSILON,
        CompareOperator::NotEqual => (l - r).abs() >= f64::EPSILON,
        CompareOperator::GreaterThan => l > r,
        CompareOperator::GreaterThanEqual => l >= r,
        CompareOperator::LessThan => l < r,
        CompareOperator::LessThanEqual => l <= r,
    }
}

impl CompareExpressionExecutor {
    pub fn new(
        left: Box<dyn ExpressionExecutor>,
        right: Box<dyn ExpressionExecutor>,
        op: CompareOperator,
    ) -> Result<Self, String> {
        use ApiAttributeType::*;

        let left_type = left.get_return_type();
        let right_type = right.get_return_type();

        let cmp_type = match (left_type, right_type) {
            (STRING, STRING) => ComparisonType::String,
            (BOOL, BOOL) => {
                if matches!(op, CompareOperator::Equal | CompareOperator::NotEqual) {
                    ComparisonType::Bool
                } else {
                    return Err("only == and != are supported for BOOL".to_string());
                }
            }
            (OBJECT, _) | (_, OBJECT) | (STRING, _) | (_, STRING) | (BOOL, _) | (_, BOOL) => {
                return Err(format!(
                    "cannot compare values of types {left_type:?} and {right_type:?}"
                ));
            }
            _ => {
                if left_type == DOUBLE
                    || right_type == DOUBLE
                    || left_type == FLOAT
                    || right_type == FLOAT
                {
                    ComparisonType::Double
                } else {
                    ComparisonType::Long
                }
            }
        };

        Ok(Self {
            left_executor: left,
            right_executor: right,
            operator: op,
            cmp_type,
        })
    }
}

impl ExpressionExecutor for CompareExpressionExecutor {
    fn execute(&self, event: Option<&dyn ComplexEvent>) -> Option<AttributeValue> {
        let left_val = self.left_executor.execute(event);
        let right_val = self.right_executor.execute(event);

        let (left_val, right_val) = match (left_val, right_val) {
            (Some(l), Some(r)) if !l.is_null() && !r.is_null() => (l, r),
            _ => {
                return Some(AttributeValue::Bool(matches!(
                    self.operator,
                    CompareOperator::NotEqual
                )))
            }
        };

        let res = match self.cmp_type {
            ComparisonType::Long => {
                let l = as_i64(&left_val)?;
                let r = as_i64(&right_val)?;
                compare_ord(&l, &r, self.operator)
            }
            ComparisonType::Double => {
                let l = left_val.to_number()?;
                let r = right_val.to_number()?;
                compare_f64(l, r, self.operator)
            }
            ComparisonType::Bool => {
                let l = left_val.as_bool()?;
                let r = right_val.as_bool()?;
                compare_ord(&l, &r, self.operator)
            }
            ComparisonType::String => {
                let l = left_val.as_string()?;
                let r = right_val.as_string()?;
                compare_ord(l, r, self.operator)
            }
        };
        Some(AttributeValue::Bool(res))
    }

    fn get_return_type(&self) -> ApiAttributeType {
        ApiAttributeType::BOOL
    }

    fn clone_executor(&self) -> Box<dyn ExpressionExecutor> {
        Box::new(CompareExpressionExecutor {
            left_executor: self.left_executor.clone_executor(),
            right_executor: self.right_executor.clone_executor(),
            operator: self.operator,
            cmp_type: self.cmp_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::stream::stream_event::StreamEvent;
    use crate::core::executor::constant_expression_executor::ConstantExpressionExecutor;
    use crate::core::executor::variable_expression_executor::VariableExpressionExecutor;

    fn symbol_equals(symbol: &str) -> CompareExpressionExecutor {
        CompareExpressionExecutor::new(
            Box::new(VariableExpressionExecutor::for_stream_attribute(
                0,
                ApiAttributeType::STRING,
                "symbol".to_string(),
            )),
            Box::new(ConstantExpressionExecutor::new(
                AttributeValue::String(symbol.to_string()),
                ApiAttributeType::STRING,
            )),
            CompareOperator::Equal,
        )
        .unwrap()
    }

    #[test]
    fn string_equality() {
        let exec = symbol_equals("IBM");
        let hit = StreamEvent::new_with_data(0, vec![AttributeValue::String("IBM".into())]);
        let miss = StreamEvent::new_with_data(0, vec![AttributeValue::String("WSO2".into())]);
        assert_eq!(
            exec.execute(Some(&hit as &dyn ComplexEvent)),
            Some(AttributeValue::Bool(true))
        );
        assert_eq!(
            exec.execute(Some(&miss as &dyn ComplexEvent)),
            Some(AttributeValue::Bool(false))
        );
    }

    #[test]
    fn mixed_numeric_widens() {
        let exec = CompareExpressionExecutor::new(
            Box::new(ConstantExpressionExecutor::new(
                AttributeValue::Int(3),
                ApiAttributeType::INT,
            )),
            Box::new(ConstantExpressionExecutor::new(
                AttributeValue::Double(2.5),
                ApiAttributeType::DOUBLE,
            )),
            CompareOperator::GreaterThan,
        )
        .unwrap();
        assert_eq!(exec.execute(None), Some(AttributeValue::Bool(true)));
    }

    #[test]
    fn string_vs_numeric_is_rejected() {
        let err = CompareExpressionExecutor::new(
            Box::new(ConstantExpressionExecutor::new(
                AttributeValue::String("x".into()),
                ApiAttributeType::STRING,
            )),
            Box::new(ConstantExpressionExecutor::new(
                AttributeValue::Int(1),
                ApiAttributeType::INT,
            )),
            CompareOperator::Equal,
        );
        assert!(err.is_err());
    }

    #[test]
    fn null_compares_not_equal() {
        let exec = symbol_equals("IBM");
        let null_event = StreamEvent::new_with_data(0, vec![AttributeValue::Null]);
        assert_eq!(
            exec.execute(Some(&null_event as &dyn ComplexEvent)),
            Some(AttributeValue::Bool(false))
        );
    }
}
