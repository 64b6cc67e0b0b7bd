// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/execution/query/input/mod.rs

pub mod handler;

pub use self::handler::WindowHandler;
