// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/processor/stream/window/mod.rs

use crate::core::config::{
    uniflux_app_context::UnifluxAppContext, uniflux_query_context::UnifluxQueryContext,
};
use crate::core::error::UnifluxError;
use crate::core::event::stream::stream_event::StreamEvent;
use crate::core::executor::expression_executor::ExpressionExecutor;
use crate::core::query::processor::Processor;
use crate::query_api::execution::query::input::handler::WindowHandler;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

mod unique_time_batch_window_processor;
mod unique_time_batch_window_state_holder;

pub use unique_time_batch_window_processor::{
    UniqueTimeBatchWindowFactory, UniqueTimeBatchWindowProcessor,
};
pub use unique_time_batch_window_state_holder::UniqueTimeBatchWindowStateHolder;

pub trait WindowProcessor: Processor {}

/// Windows that support point queries against their retained state.
///
/// The predicate is evaluated per retained event and must return BOOL;
/// matches are returned as detached value copies so callers never alias
/// window-owned storage.
pub trait FindableProcessor {
    fn find(&self, condition: &dyn ExpressionExecutor) -> Vec<StreamEvent>;
}

/// Factory registered in the [`UnifluxContext`] window registry, keyed by
/// window name.
///
/// [`UnifluxContext`]: crate::core::config::uniflux_context::UnifluxContext
pub trait WindowProcessorFactory: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn create(
        &self,
        handler: &WindowHandler,
        app_ctx: Arc<UnifluxAppContext>,
        query_ctx: Arc<UnifluxQueryContext>,
        parse_ctx: &crate::core::util::parser::expression_parser::ExpressionParserContext,
    ) -> Result<Arc<Mutex<dyn Processor>>, UnifluxError>;

    fn clone_box(&self) -> Box<dyn WindowProcessorFactory>;
}

/// Look up the handler's window name in the registry and build the
/// processor.
pub fn create_window_processor(
    handler: &WindowHandler,
    app_ctx: Arc<UnifluxAppContext>,
    query_ctx: Arc<UnifluxQueryContext>,
    parse_ctx: &crate::core::util::parser::expression_parser::ExpressionParserContext,
) -> Result<Arc<Mutex<dyn Processor>>, UnifluxError> {
    if let Some(factory) = app_ctx.get_uniflux_context().get_window_factory(&handler.name) {
        factory.create(handler, app_ctx, query_ctx, parse_ctx)
    } else {
        Err(UnifluxError::UnknownWindowType {
            name: handler.name.clone(),
            available: app_ctx.get_uniflux_context().list_window_factory_names(),
        })
    }
}
