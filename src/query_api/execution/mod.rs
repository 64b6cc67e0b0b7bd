// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/execution/mod.rs

pub mod query;
