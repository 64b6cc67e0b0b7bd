// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/stream/stream_event_cloner.rs

use super::stream_event::StreamEvent;
use crate::query_api::definition::StreamDefinition;

/// Produces independent value copies of stream events.
///
/// The window engine clones every inbound event before buffering it so the
/// buffered state never aliases caller-owned storage, and clones again when
/// the same observation has to live in two places (expiry list vs. the
/// latest-by-key map) with independently mutated timestamps.
#[derive(Debug, Clone)]
pub struct StreamEventCloner {
    pub before_window_data_size: usize,
    pub output_data_size: usize,
}

impl StreamEventCloner {
    pub fn new(before_window_data_size: usize, output_data_size: usize) -> Self {
        Self {
            before_window_data_size,
            output_data_size,
        }
    }

    pub fn from_definition(definition: &StreamDefinition) -> Self {
        Self::new(definition.attribute_list.len(), 0)
    }

    /// Copy a single event, never its chain pointer.
    pub fn copy_stream_event(&self, event: &StreamEvent) -> StreamEvent {
        let mut copy = event.clone_without_next();
        // Events narrower than the declared stream arity are padded so
        // position-based access stays in bounds.
        if copy.before_window_data.len() < self.before_window_data_size {
            copy.before_window_data
                .resize(self.before_window_data_size, Default::default());
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::value::AttributeValue;
    use crate::query_api::definition::attribute::Type as AttrType;

    #[test]
    fn copy_pads_to_declared_arity() {
        let def = StreamDefinition::new("S".to_string())
            .attribute("a".to_string(), AttrType::STRING)
            .attribute("b".to_string(), AttrType::INT);
        let cloner = StreamEventCloner::from_definition(&def);

        let ev = StreamEvent::new_with_data(5, vec![AttributeValue::String("x".into())]);
        let copy = cloner.copy_stream_event(&ev);
        assert_eq!(copy.before_window_data.len(), 2);
        assert_eq!(copy.before_window_data[1], AttributeValue::Null);
        assert!(!copy.has_next());
    }
}
