// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/uniflux_constants.rs

// Which data section of a StreamEvent a position array addresses.
pub const BEFORE_WINDOW_DATA_INDEX: usize = 0;
pub const OUTPUT_DATA_INDEX: usize = 2;

// Slots within the four-element position array used by variable executors.
pub const STREAM_EVENT_CHAIN_INDEX: usize = 0;
pub const STREAM_EVENT_INDEX_IN_CHAIN: usize = 1;
pub const STREAM_ATTRIBUTE_TYPE_INDEX: usize = 2;
pub const STREAM_ATTRIBUTE_INDEX_IN_TYPE: usize = 3;
