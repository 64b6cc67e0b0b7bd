// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/mod.rs

pub mod condition;
pub mod constant_expression_executor;
pub mod expression_executor;
pub mod variable_expression_executor;

pub use self::constant_expression_executor::ConstantExpressionExecutor;
pub use self::expression_executor::ExpressionExecutor;
pub use self::variable_expression_executor::VariableExpressionExecutor;
