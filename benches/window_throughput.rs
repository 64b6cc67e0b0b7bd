// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingest/flush hot-path benchmark for the unique time batch window.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::{Arc, Mutex};

use uniflux::core::config::{
    uniflux_app_context::UnifluxAppContext, uniflux_context::UnifluxContext,
    uniflux_query_context::UnifluxQueryContext,
};
use uniflux::core::event::complex_event::ComplexEvent;
use uniflux::core::event::stream::stream_event::StreamEvent;
use uniflux::core::event::value::AttributeValue;
use uniflux::core::query::processor::stream::window::UniqueTimeBatchWindowProcessor;
use uniflux::core::query::processor::{ProcessingMode, Processor};
use uniflux::core::util::parser::expression_parser::ExpressionParserContext;
use uniflux::core::util::timestamp::ManualTimestampGenerator;
use uniflux::query_api::definition::{attribute::Type as AttrType, StreamDefinition};
use uniflux::query_api::execution::query::input::handler::WindowHandler;
use uniflux::query_api::expression::{ConstantValue, Expression};

/// Sink that swallows everything.
#[derive(Debug)]
struct NullSink {
    app_ctx: Arc<UnifluxAppContext>,
    query_ctx: Arc<UnifluxQueryContext>,
}

impl Processor for NullSink {
    fn process(&self, chunk: Option<Box<dyn ComplexEvent>>) {
        black_box(chunk);
    }

    fn next_processor(&self) -> Option<Arc<Mutex<dyn Processor>>> {
        None
    }

    fn set_next_processor(&mut self, _next: Option<Arc<Mutex<dyn Processor>>>) {}

    fn clone_processor(&self, query_ctx: &Arc<UnifluxQueryContext>) -> Box<dyn Processor> {
        Box::new(NullSink {
            app_ctx: Arc::clone(&self.app_ctx),
            query_ctx: Arc::clone(query_ctx),
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

struct BenchSetup {
    clock: Arc<ManualTimestampGenerator>,
    window: UniqueTimeBatchWindowProcessor,
}

fn setup(window_ms: i64) -> BenchSetup {
    let clock = Arc::new(ManualTimestampGenerator::new(0));
    let mut app_ctx = UnifluxAppContext::new(Arc::new(UnifluxContext::new()), "Bench".to_string());
    app_ctx.set_timestamp_generator(Arc::clone(&clock));
    let app_ctx = Arc::new(app_ctx);
    let query_ctx = Arc::new(UnifluxQueryContext::new(
        Arc::clone(&app_ctx),
        "bench".to_string(),
        None,
    ));

    let definition = StreamDefinition::new("Stock".to_string())
        .attribute("symbol".to_string(), AttrType::STRING)
        .attribute("price".to_string(), AttrType::INT);
    let parse_ctx = ExpressionParserContext::new(&definition);
    let handler = WindowHandler::new(
        "uniqueTimeBatch",
        vec![
            Expression::variable("symbol"),
            Expression::constant(ConstantValue::Long(window_ms)),
        ],
    );
    let mut window = UniqueTimeBatchWindowProcessor::from_handler(
        &handler,
        Arc::clone(&app_ctx),
        Arc::clone(&query_ctx),
        &parse_ctx,
    )
    .expect("valid config");
    window.set_next_processor(Some(Arc::new(Mutex::new(NullSink {
        app_ctx,
        query_ctx,
    }))));

    BenchSetup { clock, window }
}

fn event(ts: i64, symbol: u64) -> StreamEvent {
    StreamEvent::new_with_data(
        ts,
        vec![
            AttributeValue::String(format!("S{symbol}")),
            AttributeValue::Int(ts as i32),
        ],
    )
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_time_batch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("ingest", |b| {
        let s = setup(i64::MAX / 2);
        let mut ts = 0i64;
        b.iter(|| {
            ts += 1;
            s.clock.set_time(ts);
            s.window.process(Some(Box::new(event(ts, (ts % 1024) as u64))));
        });
    });

    group.bench_function("ingest_then_flush_100", |b| {
        b.iter(|| {
            let s = setup(1000);
            for i in 0..100i64 {
                s.clock.set_time(i);
                s.window.process(Some(Box::new(event(i, (i % 16) as u64))));
            }
            s.clock.set_time(1000);
            s.window.process(None);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
