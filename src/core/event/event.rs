// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/event.rs

use super::complex_event::{ComplexEvent, ComplexEventType};
use super::value::AttributeValue;
use serde::{Deserialize, Serialize};

/// A single data event at the ingestion/output boundary: a timestamp and a
/// flat attribute vector. Inside the engine events travel as
/// [`StreamEvent`](super::stream::StreamEvent) chains; this plain form is
/// what callers hand in and what sinks hand back out.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: i64,
    pub data: Vec<AttributeValue>,
    pub is_expired: bool,
}

impl Event {
    pub fn new_with_data(timestamp: i64, data: Vec<AttributeValue>) -> Self {
        Event {
            timestamp,
            data,
            is_expired: false,
        }
    }

    pub fn new_with_size(timestamp: i64, data_len: usize) -> Self {
        Event {
            timestamp,
            data: vec![AttributeValue::default(); data_len],
            is_expired: false,
        }
    }

    pub fn get_data_at_idx(&self, i: usize) -> Option<&AttributeValue> {
        self.data.get(i)
    }

    /// Copy timestamp, payload and expiry status from a [`ComplexEvent`].
    pub fn copy_from_complex(&mut self, complex_event: &dyn ComplexEvent) {
        self.timestamp = complex_event.get_timestamp();
        self.is_expired = complex_event.get_event_type() == ComplexEventType::Expired;
        if let Some(out) = complex_event.get_output_data() {
            self.data = out.to_vec();
        } else {
            self.data.clear();
        }
    }
}

use std::fmt;

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event{{timestamp={}, data={:?}, is_expired={}}}",
            self.timestamp, self.data, self.is_expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::stream::stream_event::StreamEvent;

    #[test]
    fn copies_from_complex_event() {
        let mut se = StreamEvent::new_with_data(7, vec![AttributeValue::Int(1)]);
        se.output_data = Some(vec![AttributeValue::Int(42)]);
        se.set_event_type(ComplexEventType::Expired);

        let mut event = Event::new_with_size(0, 0);
        event.copy_from_complex(&se);
        assert_eq!(event.timestamp, 7);
        assert!(event.is_expired);
        assert_eq!(event.data, vec![AttributeValue::Int(42)]);
        assert_eq!(event.get_data_at_idx(0), Some(&AttributeValue::Int(42)));
    }
}
