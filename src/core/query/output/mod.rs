// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/output/mod.rs

pub mod callback_processor;

pub use self::callback_processor::CallbackProcessor;
