// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/expression/mod.rs

pub mod constant;
pub mod variable;

pub use self::constant::{Constant, ConstantValue, TimeUtil};
pub use self::variable::Variable;

/// Comparison operator for predicate expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
}

/// A binary comparison between two sub-expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct Compare {
    pub left: Expression,
    pub operator: CompareOperator,
    pub right: Expression,
}

/// Expression tree consumed by the executor parser.
///
/// Deliberately small: window parameters are constants and variables, and
/// lookup predicates are comparisons over them. Anything richer belongs to
/// the enclosing query engine, not this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Constant(Constant),
    Variable(Variable),
    Compare(Box<Compare>),
}

impl Expression {
    pub fn constant(value: ConstantValue) -> Self {
        Expression::Constant(Constant::new(value))
    }

    pub fn variable(attribute_name: impl Into<String>) -> Self {
        Expression::Variable(Variable::new(attribute_name.into()))
    }

    pub fn compare(left: Expression, operator: CompareOperator, right: Expression) -> Self {
        Expression::Compare(Box::new(Compare {
            left,
            operator,
            right,
        }))
    }
}
