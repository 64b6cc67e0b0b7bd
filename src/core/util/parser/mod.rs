// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/parser/mod.rs

pub mod expression_parser;

pub use self::expression_parser::{parse_expression, ExpressionParserContext};
