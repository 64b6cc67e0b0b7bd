// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/config/uniflux_app_context.rs

use crate::core::config::uniflux_context::UnifluxContext;
use crate::core::persistence::snapshot_service::SnapshotService;
use crate::core::util::scheduler::Scheduler;
use crate::core::util::timestamp::{SystemTimestampGenerator, TimestampGenerator};
use std::sync::{Arc, RwLock};

/// Per-application service container handed to every processor: the clock,
/// the timer subsystem, the snapshot service, and the root context.
#[derive(Debug)]
pub struct UnifluxAppContext {
    uniflux_context: Arc<UnifluxContext>,
    pub name: String,
    timestamp_generator: Arc<dyn TimestampGenerator>,
    scheduler: RwLock<Option<Arc<Scheduler>>>,
    snapshot_service: RwLock<Option<Arc<SnapshotService>>>,
}

impl UnifluxAppContext {
    pub fn new(uniflux_context: Arc<UnifluxContext>, name: String) -> Self {
        Self {
            uniflux_context,
            name,
            timestamp_generator: Arc::new(SystemTimestampGenerator),
            scheduler: RwLock::new(None),
            snapshot_service: RwLock::new(None),
        }
    }

    /// Context with defaults only, for unit tests.
    pub fn default_for_testing() -> Self {
        Self::new(Arc::new(UnifluxContext::new()), "TestApp".to_string())
    }

    pub fn get_uniflux_context(&self) -> Arc<UnifluxContext> {
        Arc::clone(&self.uniflux_context)
    }

    pub fn get_timestamp_generator(&self) -> Arc<dyn TimestampGenerator> {
        Arc::clone(&self.timestamp_generator)
    }

    /// Replace the clock. Tests install a manual generator here before any
    /// operator observes time.
    pub fn set_timestamp_generator(&mut self, generator: Arc<dyn TimestampGenerator>) {
        self.timestamp_generator = generator;
    }

    pub fn get_scheduler(&self) -> Option<Arc<Scheduler>> {
        self.scheduler.read().unwrap().clone()
    }

    pub fn set_scheduler(&self, scheduler: Arc<Scheduler>) {
        *self.scheduler.write().unwrap() = Some(scheduler);
    }

    pub fn get_snapshot_service(&self) -> Option<Arc<SnapshotService>> {
        self.snapshot_service.read().unwrap().clone()
    }

    pub fn set_snapshot_service(&self, service: Arc<SnapshotService>) {
        *self.snapshot_service.write().unwrap() = Some(service);
    }
}
