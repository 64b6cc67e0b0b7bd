// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/expression/constant.rs

use crate::query_api::definition::attribute::Type as AttributeType;

/// Literal value carried by a constant expression.
///
/// `Time` is a LONG in milliseconds produced by the time-literal helpers;
/// it is kept distinct so window parameters can state intent.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Time(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    pub value: ConstantValue,
}

impl Constant {
    pub fn new(value: ConstantValue) -> Self {
        Self { value }
    }

    pub fn get_type(&self) -> AttributeType {
        match self.value {
            ConstantValue::String(_) => AttributeType::STRING,
            ConstantValue::Int(_) => AttributeType::INT,
            ConstantValue::Long(_) | ConstantValue::Time(_) => AttributeType::LONG,
            ConstantValue::Float(_) => AttributeType::FLOAT,
            ConstantValue::Double(_) => AttributeType::DOUBLE,
            ConstantValue::Bool(_) => AttributeType::BOOL,
        }
    }
}

/// Helpers for building millisecond time constants.
pub struct TimeUtil;

impl TimeUtil {
    pub fn millisec(value: i64) -> ConstantValue {
        ConstantValue::Time(value)
    }

    pub fn sec(value: i64) -> ConstantValue {
        ConstantValue::Time(value * 1000)
    }

    pub fn minute(value: i64) -> ConstantValue {
        ConstantValue::Time(value * 60 * 1000)
    }

    pub fn hour(value: i64) -> ConstantValue {
        ConstantValue::Time(value * 60 * 60 * 1000)
    }
}
