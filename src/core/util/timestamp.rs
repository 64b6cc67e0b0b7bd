// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/timestamp.rs

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for the engine, in epoch milliseconds.
///
/// Every time observation the window makes goes through this seam, so tests
/// can drive boundaries deterministically with the manual generator.
pub trait TimestampGenerator: Debug + Send + Sync {
    fn current_time(&self) -> i64;
}

/// Wall-clock generator used in production.
#[derive(Debug, Default)]
pub struct SystemTimestampGenerator;

impl TimestampGenerator for SystemTimestampGenerator {
    fn current_time(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Externally advanced clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualTimestampGenerator {
    now: AtomicI64,
}

impl ManualTimestampGenerator {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set_time(&self, time: i64) {
        self.now.store(time, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: i64) -> i64 {
        self.now.fetch_add(delta, Ordering::SeqCst) + delta
    }
}

impl TimestampGenerator for ManualTimestampGenerator {
    fn current_time(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
