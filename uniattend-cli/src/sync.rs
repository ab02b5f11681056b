//! Debounced delta sync.
//!
//! Each field gets its own trailing-edge timer: a burst of edits to one
//! field sends only the last value once the field has been quiet for the
//! debounce window, while edits to other fields are flushed independently.
//! Sends are best effort. A failure is logged and never retried. Sends for
//! the same field go out one at a time, in the order they were scheduled.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};
use uniattend_core::protocol::{FieldKey, FieldUpdate};

use crate::client::AttendanceRemote;

struct Pending {
    id: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Queue {
    /// Timers still waiting out the quiet window.
    pending: HashMap<FieldKey, Pending>,
    /// Requests already sent but not yet answered, per field.
    in_flight: HashMap<FieldKey, usize>,
    /// Held for the duration of a send, one per field.
    gates: HashMap<FieldKey, Arc<tokio::sync::Mutex<()>>>,
    /// Id of the most recent schedule per field.
    last_scheduled: HashMap<FieldKey, u64>,
}

impl Queue {
    fn finish(&mut self, key: &FieldKey) {
        if let Some(count) = self.in_flight.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(key);
            }
        }
    }
}

fn lock(queue: &Mutex<Queue>) -> MutexGuard<'_, Queue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct DeltaSync<R> {
    remote: Arc<R>,
    quiet: Duration,
    queue: Arc<Mutex<Queue>>,
    tracker: TaskTracker,
    next_id: AtomicU64,
}

impl<R: AttendanceRemote> DeltaSync<R> {
    pub fn new(remote: Arc<R>, quiet: Duration) -> Self {
        Self {
            remote,
            quiet,
            queue: Arc::new(Mutex::new(Queue::default())),
            tracker: TaskTracker::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Schedule `update` to be sent once its field has been quiet for the
    /// debounce window, replacing any update still waiting for that field.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_sync(&self, update: FieldUpdate) {
        let key = update.key();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let mut queue = lock(&self.queue);
        if let Some(previous) = queue.pending.remove(&key) {
            previous.timer.abort();
            trace!(week = %key.week_id, session = %key.session_id, "pending sync superseded");
        }

        let remote = Arc::clone(&self.remote);
        let shared = Arc::clone(&self.queue);
        let quiet = self.quiet;
        let timer_key = key.clone();

        let timer = self.tracker.spawn(async move {
            tokio::time::sleep(quiet).await;

            let gate = {
                let mut queue = lock(&shared);
                let current = queue.pending.get(&timer_key).is_some_and(|p| p.id == id);
                if !current {
                    // Superseded between waking up and taking the lock
                    return;
                }
                queue.pending.remove(&timer_key);
                *queue.in_flight.entry(timer_key.clone()).or_default() += 1;
                Arc::clone(queue.gates.entry(timer_key.clone()).or_default())
            };

            let _turn = gate.lock().await;
            match remote.send_update(&update).await {
                Ok(()) => debug!(
                    week = %update.week_id,
                    session = %update.session_id,
                    "attendance code synced"
                ),
                Err(e) => warn!(
                    week = %update.week_id,
                    session = %update.session_id,
                    error = %e,
                    "failed to sync attendance code"
                ),
            }

            lock(&shared).finish(&timer_key);
        });

        queue.last_scheduled.insert(key.clone(), id);
        queue.pending.insert(key, Pending { id, timer });
    }

    /// A point in the schedule to compare against with `changed_since`.
    pub fn mark(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Fields that are unsynced now or were scheduled after `mark`.
    pub fn changed_since(&self, mark: u64) -> HashSet<FieldKey> {
        let queue = lock(&self.queue);
        let scheduled = queue
            .last_scheduled
            .iter()
            .filter(|(_, id)| **id >= mark)
            .map(|(key, _)| key);
        queue
            .pending
            .keys()
            .chain(queue.in_flight.keys())
            .chain(scheduled)
            .cloned()
            .collect()
    }

    /// Fields whose latest local value may not have reached the server yet.
    pub fn unsynced_keys(&self) -> HashSet<FieldKey> {
        let queue = lock(&self.queue);
        queue
            .pending
            .keys()
            .chain(queue.in_flight.keys())
            .cloned()
            .collect()
    }

    /// Wait until every scheduled update has been sent or has failed.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
