//! The authoritative attendance store, persisted as one JSON document.
//!
//! Every write is a read-modify-write of the whole document. Writers are
//! serialized through a mutex held across the full cycle, so concurrent
//! merges of different fields never drop each other.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uniattend_core::protocol::FieldUpdate;
use uniattend_core::{AttendResult, AttendanceStore};

#[derive(Debug)]
pub struct MergeStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl MergeStore {
    /// Open the store at `path`, creating its parent directory. The file
    /// itself is only created by the first write.
    pub fn open(path: impl Into<PathBuf>) -> AttendResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full dataset. A missing or unreadable file reads as empty.
    pub fn read_all(&self) -> AttendanceStore {
        match self.load() {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unreadable attendance data, treating as empty"
                );
                AttendanceStore::new()
            }
        }
    }

    /// Replace the whole dataset.
    pub fn overwrite_all(&self, store: &AttendanceStore) -> AttendResult<()> {
        let _guard = self.lock_writer();
        self.persist(store)?;
        debug!(weeks = store.len(), "attendance data overwritten");
        Ok(())
    }

    /// Set one field, creating the week record if it does not exist yet.
    pub fn merge_field(&self, update: &FieldUpdate) -> AttendResult<()> {
        let _guard = self.lock_writer();
        let mut store = self.read_all();
        store.set_code(&update.week_id, &update.session_id, &update.value);
        self.persist(&store)?;
        debug!(week = %update.week_id, session = %update.session_id, "field merged");
        Ok(())
    }

    fn load(&self) -> AttendResult<AttendanceStore> {
        if !self.path.exists() {
            return Ok(AttendanceStore::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    // Write to a sibling temp file and rename it over the target so readers
    // never see a half-written document.
    fn persist(&self, store: &AttendanceStore) -> AttendResult<()> {
        let content = serde_json::to_string_pretty(store)?;

        let mut temp = OsString::from(self.path.as_os_str());
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
