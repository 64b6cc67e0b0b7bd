// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/executor/condition/mod.rs

pub mod compare_expression_executor;

pub use self::compare_expression_executor::CompareExpressionExecutor;
