// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/util/scheduler.rs

use crate::core::util::timestamp::TimestampGenerator;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// A task the scheduler can fire at a requested instant.
pub trait Schedulable: Send + Sync {
    fn on_time(&self, timestamp: i64);
}

struct PendingEntry {
    due: i64,
    seq: u64,
    task: Arc<dyn Schedulable>,
}

// Heap ordering: earliest due instant first, registration order as the tie
// breaker.
impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl Eq for PendingEntry {}
impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (Reverse(self.due), Reverse(self.seq)).cmp(&(Reverse(other.due), Reverse(other.seq)))
    }
}

struct SchedulerInner {
    queue: Mutex<BinaryHeap<PendingEntry>>,
    signal: Condvar,
    shutdown: AtomicBool,
}

impl SchedulerInner {
    fn run(&self, timestamp_generator: Arc<dyn TimestampGenerator>) {
        let mut queue = self.queue.lock().unwrap();
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return;
            }
            let now = timestamp_generator.current_time();
            match queue.peek() {
                Some(entry) if entry.due <= now => {
                    let entry = queue.pop().unwrap();
                    // Fire without holding the queue lock so on_time can
                    // re-register.
                    drop(queue);
                    log::debug!("scheduler firing task due at {}", entry.due);
                    entry.task.on_time(now);
                    queue = self.queue.lock().unwrap();
                }
                Some(entry) => {
                    let wait = (entry.due - now).max(1) as u64;
                    let (guard, _) = self
                        .signal
                        .wait_timeout(queue, Duration::from_millis(wait))
                        .unwrap();
                    queue = guard;
                }
                None => {
                    queue = self.signal.wait(queue).unwrap();
                }
            }
        }
    }
}

/// One-shot wall-clock timer service.
///
/// `notify_at` is fire-and-forget: the task runs on the scheduler thread
/// once the timestamp generator's clock reaches the requested instant.
/// Registrations are never cancelled; a stale registration firing late must
/// be harmless for the registrant (the window's flush-due recheck makes
/// extra ticks no-ops). The timer thread stops when the scheduler is
/// dropped or shut down; queued tasks that have not fired are discarded.
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
    seq: AtomicU64,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.inner.queue.lock().unwrap().len();
        f.debug_struct("Scheduler")
            .field("pending", &pending)
            .finish()
    }
}

impl Scheduler {
    pub fn new(timestamp_generator: Arc<dyn TimestampGenerator>) -> Arc<Self> {
        let inner = Arc::new(SchedulerInner {
            queue: Mutex::new(BinaryHeap::new()),
            signal: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let thread_inner = Arc::clone(&inner);
        let handle = std::thread::Builder::new()
            .name("uniflux-scheduler".to_string())
            .spawn(move || thread_inner.run(timestamp_generator))
            .expect("failed to spawn scheduler thread");

        Arc::new(Scheduler {
            inner,
            seq: AtomicU64::new(0),
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Request a single future invocation of `task` at `time`.
    pub fn notify_at(&self, time: i64, task: Arc<dyn Schedulable>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        {
            let mut queue = self.inner.queue.lock().unwrap();
            queue.push(PendingEntry {
                due: time,
                seq,
                task,
            });
        }
        self.inner.signal.notify_one();
    }

    pub fn pending_count(&self) -> usize {
        self.inner.queue.lock().unwrap().len()
    }

    /// Stop the timer thread.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        self.inner.signal.notify_all();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            if handle.join().is_err() {
                log::error!("scheduler thread panicked during shutdown");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        self.inner.signal.notify_all();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::util::timestamp::SystemTimestampGenerator;
    use std::sync::atomic::AtomicUsize;

    struct CountingTask {
        fired: Arc<AtomicUsize>,
    }

    impl Schedulable for CountingTask {
        fn on_time(&self, _timestamp: i64) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn wait_for(fired: &AtomicUsize, count: usize) {
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while fired.load(Ordering::SeqCst) < count && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn fires_due_tasks() {
        let ts_gen: Arc<dyn TimestampGenerator> = Arc::new(SystemTimestampGenerator);
        let scheduler = Scheduler::new(Arc::clone(&ts_gen));
        let fired = Arc::new(AtomicUsize::new(0));

        let now = ts_gen.current_time();
        for offset in [5i64, 10, 15] {
            scheduler.notify_at(
                now + offset,
                Arc::new(CountingTask {
                    fired: Arc::clone(&fired),
                }),
            );
        }

        wait_for(&fired, 3);
        assert_eq!(fired.load(Ordering::SeqCst), 3);
        scheduler.shutdown();
    }

    #[test]
    fn past_instants_fire_immediately() {
        let ts_gen: Arc<dyn TimestampGenerator> = Arc::new(SystemTimestampGenerator);
        let scheduler = Scheduler::new(Arc::clone(&ts_gen));
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.notify_at(
            ts_gen.current_time() - 1000,
            Arc::new(CountingTask {
                fired: Arc::clone(&fired),
            }),
        );

        wait_for(&fired, 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        scheduler.shutdown();
    }

    #[test]
    fn shutdown_discards_pending() {
        let ts_gen: Arc<dyn TimestampGenerator> = Arc::new(SystemTimestampGenerator);
        let scheduler = Scheduler::new(Arc::clone(&ts_gen));
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.notify_at(
            ts_gen.current_time() + 60_000,
            Arc::new(CountingTask {
                fired: Arc::clone(&fired),
            }),
        );
        assert_eq!(scheduler.pending_count(), 1);
        scheduler.shutdown();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
