//! In-memory stand-in for the server, used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use uniattend_core::AttendanceStore;
use uniattend_core::protocol::FieldUpdate;

use crate::client::AttendanceRemote;

#[derive(Default)]
pub struct FakeRemote {
    store: Mutex<AttendanceStore>,
    sent: Mutex<Vec<FieldUpdate>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
    fetch_delay: Mutex<Duration>,
    send_delays: Mutex<VecDeque<Duration>>,
}

impl FakeRemote {
    pub fn with_store(store: AttendanceStore) -> Self {
        Self {
            store: Mutex::new(store),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let remote = Self::default();
        remote.set_failing(true);
        remote
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make `fetch_all` answer with the store as it was when the request
    /// arrived, after `delay`.
    pub fn delay_fetches(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    /// Delay the next sends, one duration per send, before they are applied.
    pub fn delay_sends(&self, delays: impl IntoIterator<Item = Duration>) {
        self.send_delays.lock().unwrap().extend(delays);
    }

    /// Updates the fake server accepted, in arrival order.
    pub fn sent(&self) -> Vec<FieldUpdate> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> AttendanceStore {
        self.store.lock().unwrap().clone()
    }

    /// Simulate another client writing to the server.
    pub fn write_directly(&self, week_id: &str, session_id: &str, raw: &str) {
        self.store.lock().unwrap().set_code(week_id, session_id, raw);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("server unreachable");
        }
        Ok(())
    }
}

impl AttendanceRemote for FakeRemote {
    async fn fetch_all(&self) -> Result<AttendanceStore> {
        self.check()?;
        let store = self.store();
        let delay = *self.fetch_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        Ok(store)
    }

    async fn replace_all(&self, store: &AttendanceStore) -> Result<()> {
        self.check()?;
        *self.store.lock().unwrap() = store.clone();
        Ok(())
    }

    async fn send_update(&self, update: &FieldUpdate) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let delay = self.send_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.write_directly(&update.week_id, &update.session_id, &update.value);
        self.sent.lock().unwrap().push(update.clone());
        Ok(())
    }
}
