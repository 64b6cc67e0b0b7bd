// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/processor/mod.rs

use crate::core::config::uniflux_app_context::UnifluxAppContext;
use crate::core::config::uniflux_query_context::UnifluxQueryContext;
use crate::core::event::complex_event::ComplexEvent;
use crate::core::util::scheduler::Scheduler;

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingMode {
    #[default]
    DEFAULT,
    SLIDE,
    BATCH,
}

/// Common metadata for processors.
#[derive(Debug, Clone)]
pub struct CommonProcessorMeta {
    pub uniflux_app_context: Arc<UnifluxAppContext>,
    pub uniflux_query_context: Arc<UnifluxQueryContext>,
    pub query_name: String,
    pub next_processor: Option<Arc<Mutex<dyn Processor>>>,
}

impl CommonProcessorMeta {
    pub fn new(
        app_context: Arc<UnifluxAppContext>,
        query_context: Arc<UnifluxQueryContext>,
    ) -> Self {
        Self {
            uniflux_app_context: app_context,
            query_name: query_context.name.clone(),
            uniflux_query_context: query_context,
            next_processor: None,
        }
    }

    pub fn get_uniflux_query_context(&self) -> Arc<UnifluxQueryContext> {
        Arc::clone(&self.uniflux_query_context)
    }
}

/// Trait for stream processors that process event chunks.
pub trait Processor: Debug + Send + Sync {
    fn process(&self, complex_event_chunk: Option<Box<dyn ComplexEvent>>);

    /// Like [`Processor::process`], but carries the batch-unit marking for
    /// chunks that must be applied downstream as one atomic group (a window
    /// flush). Processors that don't care inherit the pass-through.
    fn process_batch(&self, complex_event_chunk: Option<Box<dyn ComplexEvent>>, _is_batch: bool) {
        self.process(complex_event_chunk);
    }

    fn next_processor(&self) -> Option<Arc<Mutex<dyn Processor>>>;
    fn set_next_processor(&mut self, next_processor: Option<Arc<Mutex<dyn Processor>>>);
    fn clone_processor(&self, query_context: &Arc<UnifluxQueryContext>) -> Box<dyn Processor>;
    fn get_uniflux_app_context(&self) -> Arc<UnifluxAppContext>;
    fn get_uniflux_query_context(&self) -> Arc<UnifluxQueryContext>;
    fn get_processing_mode(&self) -> ProcessingMode;
    fn is_stateful(&self) -> bool;
}

/// Processors that need timer callbacks implement this so the runtime can
/// hand them the scheduler after construction.
pub trait SchedulingProcessor {
    fn set_scheduler(&self, scheduler: Arc<Scheduler>);
    fn scheduler(&self) -> Option<Arc<Scheduler>>;
}

pub mod stream;
