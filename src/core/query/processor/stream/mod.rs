// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/processor/stream/mod.rs

pub mod window;
