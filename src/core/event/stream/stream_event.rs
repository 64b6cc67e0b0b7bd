// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/stream/stream_event.rs

use crate::core::event::complex_event::{ComplexEvent, ComplexEventType};
use crate::core::event::value::AttributeValue;
use crate::core::util::uniflux_constants::{
    BEFORE_WINDOW_DATA_INDEX, OUTPUT_DATA_INDEX, STREAM_ATTRIBUTE_INDEX_IN_TYPE,
    STREAM_ATTRIBUTE_TYPE_INDEX,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

/// The concrete event flowing through processor chains.
///
/// `before_window_data` holds the raw stream attributes; `output_data` is
/// only populated once a projection has run, which inside this crate means
/// it is usually `None`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StreamEvent {
    pub timestamp: i64,
    pub output_data: Option<Vec<AttributeValue>>,
    pub event_type: ComplexEventType,
    pub before_window_data: Vec<AttributeValue>,

    #[serde(default, skip_serializing, skip_deserializing)]
    pub next: Option<Box<dyn ComplexEvent>>,
}

impl Clone for StreamEvent {
    fn clone(&self) -> Self {
        // The chain pointer is intentionally not cloned: a copied event is a
        // standalone value, never an alias into someone else's chunk.
        self.clone_without_next()
    }
}

impl StreamEvent {
    pub fn new(timestamp: i64, before_window_data_size: usize, output_data_size: usize) -> Self {
        StreamEvent {
            timestamp,
            output_data: if output_data_size > 0 {
                Some(vec![AttributeValue::default(); output_data_size])
            } else {
                None
            },
            event_type: ComplexEventType::default(),
            before_window_data: vec![AttributeValue::default(); before_window_data_size],
            next: None,
        }
    }

    /// Create a CURRENT event carrying `data` as its stream attributes.
    pub fn new_with_data(timestamp: i64, data: Vec<AttributeValue>) -> Self {
        StreamEvent {
            timestamp,
            output_data: None,
            event_type: ComplexEventType::Current,
            before_window_data: data,
            next: None,
        }
    }

    /// Retrieve an attribute via the position-array convention used by
    /// variable expression executors.
    pub fn get_attribute_by_position(&self, position: &[i32]) -> Option<&AttributeValue> {
        let attr_index = *position.get(STREAM_ATTRIBUTE_INDEX_IN_TYPE)? as usize;
        match position.get(STREAM_ATTRIBUTE_TYPE_INDEX).copied()? as usize {
            BEFORE_WINDOW_DATA_INDEX => self.before_window_data.get(attr_index),
            OUTPUT_DATA_INDEX => self.output_data.as_ref().and_then(|v| v.get(attr_index)),
            _ => None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Shallow clone without the chain pointer.
    pub fn clone_without_next(&self) -> Self {
        StreamEvent {
            timestamp: self.timestamp,
            output_data: self.output_data.clone(),
            event_type: self.event_type,
            before_window_data: self.before_window_data.clone(),
            next: None,
        }
    }

    /// Value equality: two events are the same observation if their
    /// timestamp, type and attribute sections all match. The chain pointer
    /// never participates.
    pub fn events_equal(&self, other: &StreamEvent) -> bool {
        self.timestamp == other.timestamp
            && self.event_type == other.event_type
            && self.before_window_data == other.before_window_data
            && self.output_data == other.output_data
    }
}

impl ComplexEvent for StreamEvent {
    fn get_next(&self) -> Option<&dyn ComplexEvent> {
        self.next.as_deref()
    }

    fn set_next(
        &mut self,
        next_event: Option<Box<dyn ComplexEvent>>,
    ) -> Option<Box<dyn ComplexEvent>> {
        let old_next = self.next.take();
        self.next = next_event;
        old_next
    }

    fn mut_next_ref_option(&mut self) -> &mut Option<Box<dyn ComplexEvent>> {
        &mut self.next
    }

    fn get_output_data(&self) -> Option<&[AttributeValue]> {
        self.output_data.as_deref()
    }

    fn set_output_data(&mut self, data: Option<Vec<AttributeValue>>) {
        self.output_data = data;
    }

    fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    fn get_event_type(&self) -> ComplexEventType {
        self.event_type
    }

    fn set_event_type(&mut self, event_type: ComplexEventType) {
        self.event_type = event_type;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
