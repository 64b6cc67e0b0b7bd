// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/parser/expression_parser.rs

use crate::core::error::UnifluxError;
use crate::core::event::value::AttributeValue;
use crate::core::executor::condition::CompareExpressionExecutor;
use crate::core::executor::constant_expression_executor::ConstantExpressionExecutor;
use crate::core::executor::expression_executor::ExpressionExecutor;
use crate::core::executor::variable_expression_executor::VariableExpressionExecutor;
use crate::query_api::definition::StreamDefinition;
use crate::query_api::expression::{ConstantValue, Expression};

/// Resolution context for compiling expressions: the stream definition the
/// attribute names bind against.
#[derive(Debug, Clone)]
pub struct ExpressionParserContext<'a> {
    pub stream_definition: &'a StreamDefinition,
}

impl<'a> ExpressionParserContext<'a> {
    pub fn new(stream_definition: &'a StreamDefinition) -> Self {
        Self { stream_definition }
    }
}

/// Compile an expression tree into an executor.
pub fn parse_expression(
    expression: &Expression,
    ctx: &ExpressionParserContext<'_>,
) -> Result<Box<dyn ExpressionExecutor>, UnifluxError> {
    match expression {
        Expression::Constant(c) => {
            let return_type = c.get_type();
            let value = match &c.value {
                ConstantValue::String(s) => AttributeValue::String(s.clone()),
                ConstantValue::Int(i) => AttributeValue::Int(*i),
                ConstantValue::Long(l) => AttributeValue::Long(*l),
                ConstantValue::Float(f) => AttributeValue::Float(*f),
                ConstantValue::Double(d) => AttributeValue::Double(*d),
                ConstantValue::Bool(b) => AttributeValue::Bool(*b),
                ConstantValue::Time(t) => AttributeValue::Long(*t),
            };
            Ok(Box::new(ConstantExpressionExecutor::new(
                value,
                return_type,
            )))
        }
        Expression::Variable(v) => {
            let position = ctx
                .stream_definition
                .attribute_position(&v.attribute_name)
                .ok_or_else(|| {
                    UnifluxError::InvalidConfiguration(format!(
                        "attribute '{}' not defined on stream '{}'",
                        v.attribute_name, ctx.stream_definition.id
                    ))
                })?;
            let return_type = ctx.stream_definition.attribute_list[position].get_type();
            Ok(Box::new(VariableExpressionExecutor::for_stream_attribute(
                position,
                return_type,
                v.attribute_name.clone(),
            )))
        }
        Expression::Compare(cmp) => {
            let left = parse_expression(&cmp.left, ctx)?;
            let right = parse_expression(&cmp.right, ctx)?;
            let exec = CompareExpressionExecutor::new(left, right, cmp.operator)
                .map_err(UnifluxError::InvalidConfiguration)?;
            Ok(Box::new(exec))
        }
    }
}
