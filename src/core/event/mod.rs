// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/mod.rs

pub mod complex_event;
pub mod event;
pub mod stream;
pub mod value;

pub use self::complex_event::{ComplexEvent, ComplexEventType};
pub use self::event::Event;
pub use self::value::AttributeValue;
