// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/complex_event.rs

use super::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

/// Type of complex event (CURRENT, EXPIRED, TIMER, RESET).
///
/// CURRENT carries new state, EXPIRED retracts previously emitted state,
/// RESET tells downstream to clear accumulated state before applying what
/// follows, TIMER carries no data and only drives time forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplexEventType {
    #[default]
    Current,
    Expired,
    Timer,
    Reset,
}

/// Trait for events that form a linked chunk and carry attribute data.
pub trait ComplexEvent: Debug + Send + Sync + 'static {
    fn get_next(&self) -> Option<&dyn ComplexEvent>;
    /// Replace the `next` pointer, returning the old one.
    fn set_next(&mut self, next_event: Option<Box<dyn ComplexEvent>>)
        -> Option<Box<dyn ComplexEvent>>;
    /// Mutable access to the `next` slot for tail-appending while building
    /// chains.
    fn mut_next_ref_option(&mut self) -> &mut Option<Box<dyn ComplexEvent>>;

    fn get_output_data(&self) -> Option<&[AttributeValue]>;
    fn set_output_data(&mut self, data: Option<Vec<AttributeValue>>);

    fn get_timestamp(&self) -> i64;
    fn set_timestamp(&mut self, timestamp: i64);

    fn get_event_type(&self) -> ComplexEventType;
    fn set_event_type(&mut self, event_type: ComplexEventType);

    fn is_expired(&self) -> bool {
        self.get_event_type() == ComplexEventType::Expired
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
