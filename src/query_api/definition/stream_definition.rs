// SPDX-License-Identifier: MIT OR Apache-2.0

// src/query_api/definition/stream_definition.rs

use crate::query_api::definition::attribute::{Attribute, Type as AttributeType};

/// Defines a stream with a unique ID and an ordered list of attributes.
///
/// Attribute order is load-bearing: expression executors address attributes
/// by position, and the window's dedup key is built from attribute positions
/// resolved against this definition.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StreamDefinition {
    pub id: String,
    pub attribute_list: Vec<Attribute>,
}

impl StreamDefinition {
    pub fn new(id: String) -> Self {
        StreamDefinition {
            id,
            attribute_list: Vec::new(),
        }
    }

    pub fn id(stream_id: String) -> Self {
        Self::new(stream_id)
    }

    /// Builder-style attribute registration.
    pub fn attribute(mut self, attribute_name: String, attribute_type: AttributeType) -> Self {
        if self
            .attribute_list
            .iter()
            .any(|attr| attr.get_name() == attribute_name)
        {
            log::warn!(
                "duplicate attribute '{}' in stream definition '{}'",
                attribute_name,
                self.id
            );
        }
        self.attribute_list
            .push(Attribute::new(attribute_name, attribute_type));
        self
    }

    /// Position of the named attribute within the event data vector.
    pub fn attribute_position(&self, name: &str) -> Option<usize> {
        self.attribute_list
            .iter()
            .position(|attr| attr.get_name() == name)
    }

    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attribute_list
            .iter()
            .find(|attr| attr.get_name() == name)
            .map(|attr| attr.get_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_positions_follow_declaration_order() {
        let def = StreamDefinition::new("Stock".to_string())
            .attribute("symbol".to_string(), AttributeType::STRING)
            .attribute("price".to_string(), AttributeType::DOUBLE)
            .attribute("volume".to_string(), AttributeType::LONG);

        assert_eq!(def.attribute_position("symbol"), Some(0));
        assert_eq!(def.attribute_position("volume"), Some(2));
        assert_eq!(def.attribute_position("missing"), None);
        assert_eq!(def.attribute_type("price"), Some(AttributeType::DOUBLE));
    }
}
