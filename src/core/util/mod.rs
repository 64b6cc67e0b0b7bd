// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/mod.rs

pub mod parser;
pub mod scheduler;
pub mod serialization;
pub mod timestamp;
pub mod uniflux_constants;

pub use self::scheduler::{Schedulable, Scheduler};
pub use self::serialization::{from_bytes, to_bytes};
pub use self::timestamp::{
    ManualTimestampGenerator, SystemTimestampGenerator, TimestampGenerator,
};
