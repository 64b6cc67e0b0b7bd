// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/output/callback_processor.rs

use crate::core::config::uniflux_app_context::UnifluxAppContext;
use crate::core::config::uniflux_query_context::UnifluxQueryContext;
use crate::core::event::complex_event::ComplexEvent;
use crate::core::event::event::Event;
use crate::core::query::processor::{CommonProcessorMeta, ProcessingMode, Processor};
use crate::core::stream::output::stream_callback::StreamCallback;
use std::sync::{Arc, Mutex};

/// Terminal processor handing events to a [`StreamCallback`].
#[derive(Debug)]
pub struct CallbackProcessor {
    meta: CommonProcessorMeta,
    callback: Arc<Mutex<Box<dyn StreamCallback>>>,
}

impl CallbackProcessor {
    pub fn new(
        callback: Arc<Mutex<Box<dyn StreamCallback>>>,
        app_ctx: Arc<UnifluxAppContext>,
        query_ctx: Arc<UnifluxQueryContext>,
    ) -> Self {
        Self {
            meta: CommonProcessorMeta::new(app_ctx, query_ctx),
            callback,
        }
    }
}

/// Flatten a complex event into a boundary event. Window events carry their
/// payload in `before_window_data`; projected events carry it in
/// `output_data`.
fn complex_event_to_simple_event(ce_box: Box<dyn ComplexEvent>) -> Event {
    let data = match ce_box.get_output_data() {
        Some(out) => out.to_vec(),
        None => ce_box
            .as_any()
            .downcast_ref::<crate::core::event::stream::StreamEvent>()
            .map(|se| se.before_window_data.clone())
            .unwrap_or_default(),
    };
    let mut event = Event::new_with_data(ce_box.get_timestamp(), data);
    event.is_expired = ce_box.is_expired();
    event
}

impl Processor for CallbackProcessor {
    fn process(&self, complex_event_chunk: Option<Box<dyn ComplexEvent>>) {
        self.process_batch(complex_event_chunk, false);
    }

    fn process_batch(&self, complex_event_chunk: Option<Box<dyn ComplexEvent>>, is_batch: bool) {
        let mut events_vec: Vec<Event> = Vec::new();
        let mut current_opt = complex_event_chunk;

        while let Some(mut current_box) = current_opt {
            let next_event_in_chunk = current_box.set_next(None);
            events_vec.push(complex_event_to_simple_event(current_box));
            current_opt = next_event_in_chunk;
        }

        if !events_vec.is_empty() {
            self.callback
                .lock()
                .expect("callback mutex poisoned")
                .receive_events(&events_vec, is_batch);
        }
    }

    fn next_processor(&self) -> Option<Arc<Mutex<dyn Processor>>> {
        None
    }

    fn set_next_processor(&mut self, _next: Option<Arc<Mutex<dyn Processor>>>) {}

    fn clone_processor(&self, query_ctx: &Arc<UnifluxQueryContext>) -> Box<dyn Processor> {
        Box::new(Self::new(
            Arc::clone(&self.callback),
            Arc::clone(&self.meta.uniflux_app_context),
            Arc::clone(query_ctx),
        ))
    }

    fn get_uniflux_app_context(&self) -> Arc<UnifluxAppContext> {
        Arc::clone(&self.meta.uniflux_app_context)
    }

    fn get_uniflux_query_context(&self) -> Arc<UnifluxQueryContext> {
        self.meta.get_uniflux_query_context()
    }

    fn get_processing_mode(&self) -> ProcessingMode {
        ProcessingMode::DEFAULT
    }

    fn is_stateful(&self) -> bool {
        false
    }
}
