// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/query/processor/stream/window/unique_time_batch_window_processor.rs

use crate::core::config::{
    uniflux_app_context::UnifluxAppContext, uniflux_query_context::UnifluxQueryContext,
};
use crate::core::error::UnifluxError;
use crate::core::event::complex_event::{ComplexEvent, ComplexEventType};
use crate::core::event::stream::stream_event::StreamEvent;
use crate::core::event::stream::stream_event_cloner::StreamEventCloner;
use crate::core::event::value::AttributeValue;
use crate::core::executor::expression_executor::ExpressionExecutor;
use crate::core::executor::variable_expression_executor::VariableExpressionExecutor;
use crate::core::query::processor::stream::window::{
    FindableProcessor, WindowProcessor, WindowProcessorFactory,
};
use crate::core::query::processor::{
    CommonProcessorMeta, ProcessingMode, Processor, SchedulingProcessor,
};
use crate::core::util::scheduler::{Schedulable, Scheduler};
use crate::core::util::timestamp::TimestampGenerator;
use crate::query_api::execution::query::input::handler::WindowHandler;
use crate::query_api::expression::{ConstantValue, Expression};

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex, RwLock};

use super::unique_time_batch_window_state_holder::UniqueTimeBatchWindowStateHolder;

/// A tumbling time window that deduplicates by key.
///
/// Events accumulate until the next emission boundary; at the boundary the
/// batch is emitted with at most one fresh CURRENT event per dedup key,
/// preceded by EXPIRED retractions for keys whose previous snapshot value
/// was not superseded and a RESET marker telling downstream to clear state.
/// A key's latest value survives across batches in `latest_by_key` and backs
/// point lookups via [`FindableProcessor`].
#[derive(Debug)]
pub struct UniqueTimeBatchWindowProcessor {
    meta: CommonProcessorMeta,
    core: Arc<WindowCore>,
    state_holder: UniqueTimeBatchWindowStateHolder,
}

/// Mutable window state guarded by the engine's exclusive section.
#[derive(Debug, Default)]
pub(super) struct WindowState {
    /// CURRENT events accumulated since the last flush, arrival order.
    pub(super) current_batch: Vec<StreamEvent>,
    /// EXPIRED clones staged for retraction at the next flush; exactly one
    /// entry per distinct key of the last flushed batch.
    pub(super) pending_expiry: Vec<StreamEvent>,
    /// RESET clone that headed the last emitted batch.
    pub(super) reset_event: Option<StreamEvent>,
    /// Next emission boundary; `None` until the first invocation.
    pub(super) next_emit_time: Option<i64>,
}

/// Everything the engine shares between the ingestion path, the timer path
/// and the state holder.
pub(super) struct WindowCore {
    pub(super) window_ms: i64,
    /// Alignment instant; boundaries fall on `start_time + k * window_ms`
    /// when set.
    pub(super) start_time: Option<i64>,
    key_executors: Vec<VariableExpressionExecutor>,
    cloner: StreamEventCloner,
    timestamp_generator: Arc<dyn TimestampGenerator>,
    scheduler: RwLock<Option<Arc<Scheduler>>>,
    /// The engine's exclusive critical section; at most one invocation runs
    /// at a time regardless of which path triggered it.
    pub(super) state: Arc<Mutex<WindowState>>,
    /// Latest EXPIRED-typed clone per key. Written only inside the critical
    /// section; read lock-free by concurrent lookups.
    pub(super) latest_by_key: Arc<DashMap<String, StreamEvent>>,
}

impl std::fmt::Debug for WindowCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowCore")
            .field("window_ms", &self.window_ms)
            .field("start_time", &self.start_time)
            .field("keys", &self.latest_by_key.len())
            .finish()
    }
}

/// Timer callback: re-enters the engine with an empty inbound batch so the
/// flush-due check runs. There is no separate tick-only path.
struct FlushTick {
    core: Arc<WindowCore>,
    next: Option<Arc<Mutex<dyn Processor>>>,
    state_holder: UniqueTimeBatchWindowStateHolder,
}

impl Schedulable for FlushTick {
    fn on_time(&self, _timestamp: i64) {
        self.core
            .process_chunk(None, self.next.clone(), &self.state_holder);
    }
}

impl WindowCore {
    /// Single entry point for both call sites (data arrival and timer tick).
    /// Steps 1–5 of the ingestion contract run under the state lock; the
    /// assembled chunk is dispatched after the lock is released so a slow
    /// downstream cannot stall concurrent ingestion.
    pub(super) fn process_chunk(
        self: &Arc<Self>,
        chunk: Option<Box<dyn ComplexEvent>>,
        next: Option<Arc<Mutex<dyn Processor>>>,
        state_holder: &UniqueTimeBatchWindowStateHolder,
    ) {
        let outbound = {
            let mut state = self.state.lock().unwrap();
            let now = self.timestamp_generator.current_time();

            if state.next_emit_time.is_none() {
                let first = self.first_emit_time(now);
                state.next_emit_time = Some(first);
                self.arm_timer(first, &next, state_holder);
            }

            // Advance and re-arm before any batch work, so a long flush
            // cannot delay scheduling of the next boundary.
            let flush_due = now >= state.next_emit_time.unwrap();
            if flush_due {
                let re_armed = state.next_emit_time.unwrap() + self.window_ms;
                state.next_emit_time = Some(re_armed);
                self.arm_timer(re_armed, &next, state_holder);
            }

            if let Some(ref head) = chunk {
                let mut current = Some(head.as_ref() as &dyn ComplexEvent);
                while let Some(ev) = current {
                    if ev.get_event_type() == ComplexEventType::Current {
                        if let Some(se) = ev.as_any().downcast_ref::<StreamEvent>() {
                            let cloned = self.cloner.copy_stream_event(se);
                            state_holder.record_event_added(&cloned);
                            state.current_batch.push(cloned);
                        }
                    }
                    // Non-CURRENT events carry no state to accumulate.
                    current = ev.get_next();
                }
            }

            if flush_due {
                self.flush(&mut state, now, state_holder)
            } else {
                None
            }
        };

        if let Some(head) = outbound {
            if let Some(ref next) = next {
                next.lock().unwrap().process_batch(Some(head), true);
            }
        }
    }

    /// First boundary: aligned to the configured grid when a start time is
    /// set, otherwise one full window from now.
    fn first_emit_time(&self, now: i64) -> i64 {
        match self.start_time {
            Some(start) => {
                let elapsed = (now - start).rem_euclid(self.window_ms);
                now + (self.window_ms - elapsed)
            }
            None => now + self.window_ms,
        }
    }

    fn arm_timer(
        self: &Arc<Self>,
        at: i64,
        next: &Option<Arc<Mutex<dyn Processor>>>,
        state_holder: &UniqueTimeBatchWindowStateHolder,
    ) {
        if let Some(scheduler) = self.scheduler.read().unwrap().clone() {
            scheduler.notify_at(
                at,
                Arc::new(FlushTick {
                    core: Arc::clone(self),
                    next: next.clone(),
                    state_holder: state_holder.clone(),
                }),
            );
        }
    }

    /// Dedup key: the string forms of the key attributes concatenated in
    /// declared order.
    pub(super) fn generate_key(&self, event: &StreamEvent) -> String {
        let mut key = String::new();
        for executor in &self.key_executors {
            if let Some(value) = executor.execute(Some(event as &dyn ComplexEvent)) {
                let _ = write!(key, "{value}");
            }
        }
        key
    }

    /// The flush procedure. Runs inside the exclusive section; returns the
    /// outbound chain.
    ///
    /// Reconciliation walks the batch in arrival order against two expiry
    /// sequences: `fresh` (built from this batch) catches same-key
    /// duplicates within the batch, `inherited` (carried from the previous
    /// flush) catches keys re-observed across generations. In both cases
    /// the superseded value is folded back in as a CURRENT correction entry
    /// re-timestamped to the flush instant, immediately before the
    /// superseding event, instead of being silently dropped or doubly
    /// retracted. Sequences are rebuilt and swapped, never mutated while
    /// iterated.
    fn flush(
        &self,
        state: &mut WindowState,
        now: i64,
        state_holder: &UniqueTimeBatchWindowStateHolder,
    ) -> Option<Box<dyn ComplexEvent>> {
        let mut inherited = std::mem::take(&mut state.pending_expiry);
        let batch = std::mem::take(&mut state.current_batch);

        let mut fresh_expiry: Vec<StreamEvent> = Vec::with_capacity(batch.len());
        let mut corrected: Vec<StreamEvent> = Vec::with_capacity(batch.len());

        for event in batch {
            let mut to_expire = self.cloner.copy_stream_event(&event);
            to_expire.set_event_type(ComplexEventType::Expired);
            let mut for_map = self.cloner.copy_stream_event(&event);
            for_map.set_event_type(ComplexEventType::Expired);

            let key = self.generate_key(&event);
            let old = self.latest_by_key.insert(key.clone(), for_map);
            state_holder.record_key_replaced(&key, old.as_ref());

            if let Some(old) = old {
                if let Some(pos) = fresh_expiry.iter().position(|e| e.events_equal(&old)) {
                    // Key occurred earlier in this same batch: the earlier
                    // occurrence is no longer fresh. Collapse it into a
                    // correction entry preceding this event.
                    fresh_expiry.remove(pos);
                    if let Some(cpos) = corrected.iter().rposition(|e| {
                        e.timestamp == old.timestamp
                            && e.before_window_data == old.before_window_data
                    }) {
                        corrected.remove(cpos);
                    }
                    corrected.push(Self::carried(old, now));
                } else if let Some(pos) = inherited.iter().position(|e| e.events_equal(&old)) {
                    // Key carried over from the previous generation: its
                    // retraction is superseded by this batch, so fold the
                    // prior value back in instead of expiring it.
                    inherited.remove(pos);
                    corrected.push(Self::carried(old, now));
                }
            }

            fresh_expiry.push(to_expire);
            corrected.push(event);
        }

        log::debug!(
            "flush at {now}: {} current, {} expired, {} key(s) retained",
            corrected.len(),
            inherited.len(),
            self.latest_by_key.len()
        );
        state_holder.record_batch_flushed(&corrected, &inherited, now);

        let mut head: Option<Box<dyn ComplexEvent>> = None;
        let mut tail = &mut head;

        for mut expired in inherited {
            expired.set_timestamp(now);
            *tail = Some(Box::new(expired));
            tail = tail.as_mut().unwrap().mut_next_ref_option();
        }

        if !corrected.is_empty() {
            let mut reset_event = self.cloner.copy_stream_event(&corrected[0]);
            reset_event.set_event_type(ComplexEventType::Reset);
            reset_event.set_timestamp(now);
            state.reset_event = Some(reset_event.clone_without_next());
            state_holder.record_reset_event_set(&reset_event);
            *tail = Some(Box::new(reset_event));
            tail = tail.as_mut().unwrap().mut_next_ref_option();

            for event in corrected {
                *tail = Some(Box::new(event));
                tail = tail.as_mut().unwrap().mut_next_ref_option();
            }
        }

        state.pending_expiry = fresh_expiry;
        head
    }

    /// A superseded value folded back into the outgoing batch.
    fn carried(mut old: StreamEvent, now: i64) -> StreamEvent {
        old.set_event_type(ComplexEventType::Current);
        old.set_timestamp(now);
        old
    }
}

impl UniqueTimeBatchWindowProcessor {
    pub fn new(
        key_executors: Vec<VariableExpressionExecutor>,
        window_ms: i64,
        start_time: Option<i64>,
        cloner: StreamEventCloner,
        app_ctx: Arc<UnifluxAppContext>,
        query_ctx: Arc<UnifluxQueryContext>,
    ) -> Self {
        let state = Arc::new(Mutex::new(WindowState::default()));
        let latest_by_key = Arc::new(DashMap::new());

        let component_id = format!(
            "unique_time_batch_window_{}_{}",
            query_ctx.get_name(),
            window_ms
        );
        let state_holder = UniqueTimeBatchWindowStateHolder::new(
            Arc::clone(&state),
            Arc::clone(&latest_by_key),
            component_id.clone(),
            window_ms,
        );

        if let Some(snapshot_service) = app_ctx.get_snapshot_service() {
            let holder: Arc<Mutex<dyn crate::core::persistence::StateHolder>> =
                Arc::new(Mutex::new(state_holder.clone()));
            snapshot_service.register_state_holder(component_id, holder);
        }

        let core = Arc::new(WindowCore {
            window_ms,
            start_time,
            key_executors,
            cloner,
            timestamp_generator: app_ctx.get_timestamp_generator(),
            scheduler: RwLock::new(app_ctx.get_scheduler()),
            state,
            latest_by_key,
        });

        Self {
            meta: CommonProcessorMeta::new(app_ctx, query_ctx),
            core,
            state_holder,
        }
    }

    /// Standard factory entry: validate and compile the handler parameters.
    ///
    /// Expected shape: one or more key attributes, then a constant window
    /// length in milliseconds, then an optional constant alignment instant.
    pub fn from_handler(
        handler: &WindowHandler,
        app_ctx: Arc<UnifluxAppContext>,
        query_ctx: Arc<UnifluxQueryContext>,
        parse_ctx: &crate::core::util::parser::expression_parser::ExpressionParserContext,
    ) -> Result<Self, UnifluxError> {
        let params = handler.get_parameters();

        let key_count = params
            .iter()
            .take_while(|p| matches!(p, Expression::Variable(_)))
            .count();
        if key_count == 0 {
            return Err(UnifluxError::InvalidConfiguration(
                "unique time batch window requires at least one key attribute \
                 before the window length"
                    .to_string(),
            ));
        }

        let mut key_executors = Vec::with_capacity(key_count);
        for param in &params[..key_count] {
            // take_while above guarantees these are variables
            if let Expression::Variable(var) = param {
                let position = parse_ctx
                    .stream_definition
                    .attribute_position(&var.attribute_name)
                    .ok_or_else(|| {
                        UnifluxError::InvalidConfiguration(format!(
                            "key attribute '{}' not defined on stream '{}'",
                            var.attribute_name, parse_ctx.stream_definition.id
                        ))
                    })?;
                let return_type = parse_ctx.stream_definition.attribute_list[position].get_type();
                key_executors.push(VariableExpressionExecutor::for_stream_attribute(
                    position,
                    return_type,
                    var.attribute_name.clone(),
                ));
            }
        }

        let rest = &params[key_count..];
        let window_ms = match rest.first() {
            Some(Expression::Constant(c)) => match &c.value {
                ConstantValue::Int(i) => *i as i64,
                ConstantValue::Long(l) => *l,
                ConstantValue::Time(t) => *t,
                other => {
                    return Err(UnifluxError::InvalidConfiguration(format!(
                        "window length must be an INT or LONG millisecond constant, found {other:?}"
                    )))
                }
            },
            Some(other) => {
                return Err(UnifluxError::InvalidConfiguration(format!(
                    "window length must be a constant, found a dynamic parameter {other:?}"
                )))
            }
            None => {
                return Err(UnifluxError::InvalidConfiguration(
                    "unique time batch window requires a window length parameter".to_string(),
                ))
            }
        };
        if window_ms <= 0 {
            return Err(UnifluxError::InvalidConfiguration(format!(
                "window length must be positive, found {window_ms}"
            )));
        }

        let start_time = match rest.get(1) {
            None => None,
            Some(Expression::Constant(c)) => match &c.value {
                ConstantValue::Int(i) => Some(*i as i64),
                ConstantValue::Long(l) => Some(*l),
                ConstantValue::Time(t) => Some(*t),
                other => {
                    return Err(UnifluxError::InvalidConfiguration(format!(
                        "start time must be an INT or LONG millisecond constant, found {other:?}"
                    )))
                }
            },
            Some(other) => {
                return Err(UnifluxError::InvalidConfiguration(format!(
                    "start time must be a constant, found a dynamic parameter {other:?}"
                )))
            }
        };

        if rest.len() > 2 {
            return Err(UnifluxError::InvalidConfiguration(format!(
                "unique time batch window takes key attribute(s), a window length and an \
                 optional start time, but found {} parameters",
                params.len()
            )));
        }

        let cloner = StreamEventCloner::from_definition(parse_ctx.stream_definition);
        Ok(Self::new(
            key_executors,
            window_ms,
            start_time,
            cloner,
            app_ctx,
            query_ctx,
        ))
    }

    pub fn window_ms(&self) -> i64 {
        self.core.window_ms
    }

    /// Snapshot the window state for checkpointing.
    pub fn capture(
        &self,
    ) -> Result<crate::core::persistence::StateSnapshot, crate::core::persistence::StateError> {
        use crate::core::persistence::state_holder::{SerializationHints, StateHolder};
        self.state_holder.serialize_state(&SerializationHints::default())
    }

    /// Replace the window state wholesale from a snapshot. Recovery only.
    pub fn restore(
        &self,
        snapshot: &crate::core::persistence::StateSnapshot,
    ) -> Result<(), crate::core::persistence::StateError> {
        use crate::core::persistence::state_holder::StateHolder;
        self.state_holder.deserialize_state(snapshot)
    }
}

impl Processor for UniqueTimeBatchWindowProcessor {
    fn process(&self, complex_event_chunk: Option<Box<dyn ComplexEvent>>) {
        let next = self.meta.next_processor.as_ref().map(Arc::clone);
        self.core
            .process_chunk(complex_event_chunk, next, &self.state_holder);
    }

    fn next_processor(&self) -> Option<Arc<Mutex<dyn Processor>>> {
        self.meta.next_processor.as_ref().map(Arc::clone)
    }

    fn set_next_processor(&mut self, next: Option<Arc<Mutex<dyn Processor>>>) {
        self.meta.next_processor = next;
    }

    fn clone_processor(&self, query_ctx: &Arc<UnifluxQueryContext>) -> Box<dyn Processor> {
        Box::new(Self::new(
            self.core.key_executors.clone(),
            self.core.window_ms,
            self.core.start_time,
            self.core.cloner.clone(),
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
        ProcessingMode::BATCH
    }

    fn is_stateful(&self) -> bool {
        true
    }
}

impl WindowProcessor for UniqueTimeBatchWindowProcessor {}

impl SchedulingProcessor for UniqueTimeBatchWindowProcessor {
    fn set_scheduler(&self, scheduler: Arc<Scheduler>) {
        *self.core.scheduler.write().unwrap() = Some(scheduler);
    }

    fn scheduler(&self) -> Option<Arc<Scheduler>> {
        self.core.scheduler.read().unwrap().clone()
    }
}

impl FindableProcessor for UniqueTimeBatchWindowProcessor {
    /// Evaluate `condition` against the latest retained value of every key.
    /// Reads go through the concurrent map directly and do not serialize
    /// behind the ingestion/flush section.
    fn find(&self, condition: &dyn ExpressionExecutor) -> Vec<StreamEvent> {
        let mut matches = Vec::new();
        for entry in self.core.latest_by_key.iter() {
            let event = entry.value();
            if condition.execute(Some(event as &dyn ComplexEvent))
                == Some(AttributeValue::Bool(true))
            {
                matches.push(event.clone_without_next());
            }
        }
        matches
    }
}

#[derive(Debug, Clone)]
pub struct UniqueTimeBatchWindowFactory;

impl WindowProcessorFactory for UniqueTimeBatchWindowFactory {
    fn name(&self) -> &'static str {
        "uniqueTimeBatch"
    }

    fn create(
        &self,
        handler: &WindowHandler,
        app_ctx: Arc<UnifluxAppContext>,
        query_ctx: Arc<UnifluxQueryContext>,
        parse_ctx: &crate::core::util::parser::expression_parser::ExpressionParserContext,
    ) -> Result<Arc<Mutex<dyn Processor>>, UnifluxError> {
        Ok(Arc::new(Mutex::new(
            UniqueTimeBatchWindowProcessor::from_handler(handler, app_ctx, query_ctx, parse_ctx)?,
        )))
    }

    fn clone_box(&self) -> Box<dyn WindowProcessorFactory> {
        Box::new(Self)
    }
}
