// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/stream/mod.rs

pub mod stream_event;
pub mod stream_event_cloner;
pub mod stream_event_factory;

pub use self::stream_event::StreamEvent;
pub use self::stream_event_cloner::StreamEventCloner;
pub use self::stream_event_factory::StreamEventFactory;
