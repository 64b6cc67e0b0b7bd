// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test harness: a capturing sink processor and a manually clocked
//! window runner.

use std::sync::{Arc, Mutex};

use uniflux::core::config::{
    uniflux_app_context::UnifluxAppContext, uniflux_context::UnifluxContext,
    uniflux_query_context::UnifluxQueryContext,
};
use uniflux::core::event::complex_event::{ComplexEvent, ComplexEventType};
use uniflux::core::event::event::Event;
use uniflux::core::event::stream::stream_event::StreamEvent;
use uniflux::core::event::stream::stream_event_factory::StreamEventFactory;
use uniflux::core::event::value::AttributeValue;
use uniflux::core::query::processor::stream::window::UniqueTimeBatchWindowProcessor;
use uniflux::core::query::processor::{ProcessingMode, Processor};
use uniflux::core::util::parser::expression_parser::ExpressionParserContext;
use uniflux::core::util::timestamp::{ManualTimestampGenerator, TimestampGenerator};
use uniflux::query_api::definition::{attribute::Type as AttrType, StreamDefinition};
use uniflux::query_api::execution::query::input::handler::WindowHandler;
use uniflux::query_api::expression::{ConstantValue, Expression};

/// One event as observed by the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub event_type: ComplexEventType,
    pub timestamp: i64,
    pub data: Vec<AttributeValue>,
}

/// One dispatched chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedBatch {
    pub is_batch: bool,
    pub events: Vec<CapturedEvent>,
}

impl CapturedBatch {
    /// `(type, symbol)` pairs, the usual shape for order assertions.
    pub fn shape(&self) -> Vec<(ComplexEventType, String)> {
        self.events
            .iter()
            .map(|e| (e.event_type, e.data[0].to_string()))
            .collect()
    }
}

/// Terminal processor recording every dispatched chunk with its batch flag.
#[derive(Debug)]
pub struct CapturingSink {
    app_ctx: Arc<UnifluxAppContext>,
    query_ctx: Arc<UnifluxQueryContext>,
    pub batches: Arc<Mutex<Vec<CapturedBatch>>>,
}

impl CapturingSink {
    pub fn new(app_ctx: Arc<UnifluxAppContext>, query_ctx: Arc<UnifluxQueryContext>) -> Self {
        Self {
            app_ctx,
            query_ctx,
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Processor for CapturingSink {
    fn process(&self, chunk: Option<Box<dyn ComplexEvent>>) {
        self.process_batch(chunk, false);
    }

    fn process_batch(&self, chunk: Option<Box<dyn ComplexEvent>>, is_batch: bool) {
        let mut events = Vec::new();
        let mut current = chunk.as_deref();
        while let Some(ev) = current {
            if let Some(se) = ev.as_any().downcast_ref::<StreamEvent>() {
                events.push(CapturedEvent {
                    event_type: se.event_type,
                    timestamp: se.timestamp,
                    data: se.before_window_data.clone(),
                });
            }
            current = ev.get_next();
        }
        if !events.is_empty() {
            self.batches
                .lock()
                .unwrap()
                .push(CapturedBatch { is_batch, events });
        }
    }

    fn next_processor(&self) -> Option<Arc<Mutex<dyn Processor>>> {
        None
    }

    fn set_next_processor(&mut self, _next: Option<Arc<Mutex<dyn Processor>>>) {}

    fn clone_processor(&self, query_ctx: &Arc<UnifluxQueryContext>) -> Box<dyn Processor> {
        Box::new(Self {
            app_ctx: Arc::clone(&self.app_ctx),
            query_ctx: Arc::clone(query_ctx),
            batches: Arc::clone(&self.batches),
        })
    }

    fn get_uniflux_app_context(&self) -> Arc<UnifluxAppContext> {
        Arc::clone(&self.app_ctx)
    }

    fn get_uniflux_query_context(&self) -> Arc<UnifluxQueryContext> {
        Arc::clone(&self.query_ctx)
    }

    fn get_processing_mode(&self) -> ProcessingMode {
        ProcessingMode::DEFAULT
    }

    fn is_stateful(&self) -> bool {
        false
    }
}

/// `Stock (symbol STRING, price INT)` — the stream every suite runs on.
pub fn stock_definition() -> StreamDefinition {
    StreamDefinition::new("Stock".to_string())
        .attribute("symbol".to_string(), AttrType::STRING)
        .attribute("price".to_string(), AttrType::INT)
}

/// A unique time batch window wired to a capturing sink, driven by a manual
/// clock. Ticks are delivered as empty invocations of the same entry point
/// the ingestion path uses.
pub struct WindowHarness {
    pub clock: Arc<ManualTimestampGenerator>,
    pub window: UniqueTimeBatchWindowProcessor,
    pub batches: Arc<Mutex<Vec<CapturedBatch>>>,
    event_factory: StreamEventFactory,
}

impl WindowHarness {
    pub fn new(window_ms: i64, start_time: Option<i64>) -> Self {
        Self::with_app_context(window_ms, start_time, |_| {})
    }

    /// Build a harness, letting the caller attach services (snapshot
    /// service, persistence store) to the app context before the window is
    /// constructed.
    pub fn with_app_context(
        window_ms: i64,
        start_time: Option<i64>,
        configure: impl FnOnce(&UnifluxAppContext),
    ) -> Self {
        let clock = Arc::new(ManualTimestampGenerator::new(0));
        let mut app_ctx = UnifluxAppContext::new(Arc::new(UnifluxContext::new()), "App".to_string());
        app_ctx.set_timestamp_generator(Arc::clone(&clock) as Arc<dyn TimestampGenerator>);
        configure(&app_ctx);
        let app_ctx = Arc::new(app_ctx);
        let query_ctx = Arc::new(UnifluxQueryContext::new(
            Arc::clone(&app_ctx),
            "q1".to_string(),
            None,
        ));

        let definition = stock_definition();
        let parse_ctx = ExpressionParserContext::new(&definition);
        let mut params = vec![
            Expression::variable("symbol"),
            Expression::constant(ConstantValue::Long(window_ms)),
        ];
        if let Some(start) = start_time {
            params.push(Expression::constant(ConstantValue::Long(start)));
        }
        let handler = WindowHandler::new("uniqueTimeBatch", params);

        let mut window = UniqueTimeBatchWindowProcessor::from_handler(
            &handler,
            Arc::clone(&app_ctx),
            Arc::clone(&query_ctx),
            &parse_ctx,
        )
        .expect("valid window configuration");

        let sink = CapturingSink::new(Arc::clone(&app_ctx), Arc::clone(&query_ctx));
        let batches = Arc::clone(&sink.batches);
        window.set_next_processor(Some(Arc::new(Mutex::new(sink))));

        Self {
            clock,
            window,
            batches,
            event_factory: StreamEventFactory::from_definition(&definition),
        }
    }

    /// Ingest one event at the given instant, through the boundary-event
    /// conversion the ingestion edge uses.
    pub fn send(&self, ts: i64, symbol: &str, price: i32) {
        self.clock.set_time(ts);
        let event = Event::new_with_data(
            ts,
            vec![
                AttributeValue::String(symbol.to_string()),
                AttributeValue::Int(price),
            ],
        );
        self.window
            .process(Some(Box::new(self.event_factory.from_event(&event))));
    }

    /// Timer tick: an empty invocation at the given instant.
    pub fn tick(&self, ts: i64) {
        self.clock.set_time(ts);
        self.window.process(None);
    }

    pub fn batches(&self) -> Vec<CapturedBatch> {
        self.batches.lock().unwrap().clone()
    }
}
