// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/stream/stream_event_factory.rs

use super::stream_event::StreamEvent;
use crate::core::event::event::Event;
use crate::query_api::definition::StreamDefinition;

/// Builds [`StreamEvent`]s sized for a particular stream definition, and
/// converts boundary [`Event`]s into them.
#[derive(Debug, Clone)]
pub struct StreamEventFactory {
    pub before_window_data_size: usize,
    pub output_data_size: usize,
}

impl StreamEventFactory {
    pub fn new(before_window_data_size: usize, output_data_size: usize) -> Self {
        Self {
            before_window_data_size,
            output_data_size,
        }
    }

    pub fn from_definition(definition: &StreamDefinition) -> Self {
        Self::new(definition.attribute_list.len(), 0)
    }

    pub fn new_instance(&self) -> StreamEvent {
        StreamEvent::new(0, self.before_window_data_size, self.output_data_size)
    }

    /// Convert a boundary event into a CURRENT stream event, truncating or
    /// padding the payload to the declared arity.
    pub fn from_event(&self, event: &Event) -> StreamEvent {
        let mut data = event.data.clone();
        data.resize(self.before_window_data_size, Default::default());
        StreamEvent::new_with_data(event.timestamp, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::value::AttributeValue;
    use crate::query_api::definition::attribute::Type as AttrType;

    #[test]
    fn boundary_event_conversion() {
        let def = StreamDefinition::new("S".to_string())
            .attribute("sym".to_string(), AttrType::STRING)
            .attribute("price".to_string(), AttrType::DOUBLE);
        let factory = StreamEventFactory::from_definition(&def);

        let ev = Event::new_with_data(
            42,
            vec![
                AttributeValue::String("IBM".into()),
                AttributeValue::Double(101.5),
            ],
        );
        let se = factory.from_event(&ev);
        assert_eq!(se.timestamp, 42);
        assert_eq!(se.before_window_data.len(), 2);
        assert_eq!(
            se.before_window_data[0],
            AttributeValue::String("IBM".into())
        );
    }
}
