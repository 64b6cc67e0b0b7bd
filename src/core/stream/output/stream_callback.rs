// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/stream/output/stream_callback.rs

use crate::core::event::event::Event;
use std::fmt::Debug;

/// Receiver for events leaving the processor chain.
///
/// `is_batch` is true when the events form one atomic group that downstream
/// must apply together (a window flush: retractions, reset, then currents).
pub trait StreamCallback: Debug + Send + Sync {
    fn receive_events(&mut self, events: &[Event], is_batch: bool);
}
