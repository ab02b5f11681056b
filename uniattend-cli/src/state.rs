//! Client-side copy of the attendance store.
//!
//! Mutations apply to the local copy immediately and are then handed to the
//! delta sync transport; the local copy is treated as current whether or not
//! the server has seen the change yet. There is no rollback.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};
use uniattend_core::protocol::{FieldKey, FieldUpdate};
use uniattend_core::{
    AttendError, AttendResult, AttendanceStore, FieldDivergence, normalize_code,
};

use crate::client::AttendanceRemote;
use crate::sync::DeltaSync;

enum Local {
    Loading,
    Ready(Arc<AttendanceStore>),
}

pub struct AttendanceState<R> {
    remote: Arc<R>,
    local: RwLock<Local>,
    sync: DeltaSync<R>,
}

impl<R: AttendanceRemote> AttendanceState<R> {
    /// A store in the loading state. Call `hydrate` before mutating it.
    pub fn new(remote: Arc<R>, debounce: Duration) -> Self {
        let sync = DeltaSync::new(Arc::clone(&remote), debounce);
        Self {
            remote,
            local: RwLock::new(Local::Loading),
            sync,
        }
    }

    /// Load the full store from the server, once. If the server can't be
    /// read the client starts from an empty store instead of staying blocked.
    pub async fn hydrate(&self) {
        let store = match self.remote.fetch_all().await {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "failed to load attendance data, starting empty");
                AttendanceStore::new()
            }
        };
        debug!(weeks = store.len(), "hydrated");
        *self.write_local() = Local::Ready(Arc::new(store));
    }

    /// The current local copy. Snapshots are never modified afterwards.
    pub fn snapshot(&self) -> AttendResult<Arc<AttendanceStore>> {
        match &*self.read_local() {
            Local::Loading => Err(AttendError::NotHydrated),
            Local::Ready(store) => Ok(Arc::clone(store)),
        }
    }

    /// Record a code and schedule its sync.
    pub fn set_code(&self, week_id: &str, session_id: &str, raw: &str) -> AttendResult<()> {
        let code = normalize_code(raw);
        self.replace(|store| store.with_code(week_id, session_id, &code))?;
        self.sync.schedule_sync(FieldUpdate::new(week_id, session_id, code));
        Ok(())
    }

    /// Empty a week. Every session that held a code is synced as unset.
    pub fn clear_week(&self, week_id: &str) -> AttendResult<()> {
        let previous = self.replace(|store| store.with_cleared_week(week_id))?;

        if let Some(record) = previous.week(week_id) {
            for (session_id, _) in record.codes() {
                self.sync.schedule_sync(FieldUpdate::new(week_id, session_id, ""));
            }
        }
        Ok(())
    }

    /// Replace the whole store on the server, then locally. On failure the
    /// local copy is left as it was.
    ///
    /// Scheduled syncs are sent first so none of them lands on top of the
    /// imported store.
    pub async fn import(&self, store: AttendanceStore) -> Result<()> {
        self.snapshot()?;
        self.sync.flush().await;
        self.remote.replace_all(&store).await?;
        *self.write_local() = Local::Ready(Arc::new(store));
        Ok(())
    }

    /// Pull the server's copy and adopt it, keeping local values for fields
    /// whose sync hadn't completed when the fetch started or was scheduled
    /// during it. Returns the fields where the two copies disagreed,
    /// excluding those.
    pub async fn reconcile(&self) -> Result<Vec<FieldDivergence>> {
        self.snapshot()?;
        let mark = self.sync.mark();
        let mut unsynced = self.sync.unsynced_keys();
        let remote = self.remote.fetch_all().await?;

        let mut local = self.write_local();
        let Local::Ready(current) = &mut *local else {
            return Err(AttendError::NotHydrated.into());
        };

        unsynced.extend(self.sync.changed_since(mark));
        let mut merged = remote.clone();
        for key in &unsynced {
            let code = current.code(&key.week_id, &key.session_id).unwrap_or("");
            merged.set_code(&key.week_id, &key.session_id, code);
        }

        let divergences: Vec<FieldDivergence> = current
            .diff(&remote)
            .into_iter()
            .filter(|d| {
                !unsynced.contains(&FieldKey {
                    week_id: d.week_id.clone(),
                    session_id: d.session_id.clone(),
                })
            })
            .collect();

        if !divergences.is_empty() {
            debug!(fields = divergences.len(), "local copy diverged from server");
        }
        *current = Arc::new(merged);

        Ok(divergences)
    }

    /// Wait for every scheduled sync to go out.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Swap in a new snapshot built from the current one, returning the old one.
    fn replace(
        &self,
        f: impl FnOnce(&AttendanceStore) -> AttendanceStore,
    ) -> AttendResult<Arc<AttendanceStore>> {
        let mut local = self.write_local();
        match &mut *local {
            Local::Loading => Err(AttendError::NotHydrated),
            Local::Ready(current) => {
                let next = Arc::new(f(current));
                Ok(std::mem::replace(current, next))
            }
        }
    }

    fn read_local(&self) -> std::sync::RwLockReadGuard<'_, Local> {
        self.local.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_local(&self) -> std::sync::RwLockWriteGuard<'_, Local> {
        self.local.write().unwrap_or_else(PoisonError::into_inner)
    }
}
