use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::store::MergeStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<MergeStore>,
}

impl AppState {
    pub fn new(data_file: impl Into<PathBuf>) -> Result<Self> {
        let store = MergeStore::open(data_file)?;
        Ok(AppState {
            store: Arc::new(store),
        })
    }

    pub fn store(&self) -> &MergeStore {
        &self.store
    }
}
