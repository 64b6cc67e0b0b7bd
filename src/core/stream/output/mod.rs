// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/stream/output/mod.rs

pub mod stream_callback;

pub use self::stream_callback::StreamCallback;
