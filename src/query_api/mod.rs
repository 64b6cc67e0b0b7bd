// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/mod.rs

pub mod definition;
pub mod execution;
pub mod expression;
