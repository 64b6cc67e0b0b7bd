// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/stream/mod.rs

pub mod output;
