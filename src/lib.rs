// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deduplicating time-batch window engine for keyed event streams.
//!
//! The crate centers on
//! [`UniqueTimeBatchWindowProcessor`](core::query::processor::stream::window::UniqueTimeBatchWindowProcessor),
//! an operator that accumulates timestamped events, collapses them to the
//! latest value per key on a periodic wall-clock boundary, and emits
//! retraction signals for superseded values. Everything else — the event
//! model, expression executors, scheduler, and persistence stack — exists to
//! host that operator.

pub mod core;
pub mod query_api;

pub use crate::core::error::UnifluxError;
pub use crate::core::event::event::Event;
pub use crate::core::event::value::AttributeValue;
