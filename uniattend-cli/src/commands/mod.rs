pub mod clear;
pub mod copy;
pub mod edit;
pub mod export;
pub mod import;
pub mod set;
pub mod show;
pub mod weeks;

use std::sync::Arc;

use anyhow::Result;
use uniattend_core::config::UniattendConfig;
use uniattend_core::schedule::{AcademicWeek, find_week};

use crate::client::Client;
use crate::state::AttendanceState;
use crate::utils::tui::create_spinner;

/// Everything a command needs: the schedule and a hydrated store.
pub struct Context {
    pub weeks: Vec<AcademicWeek>,
    pub state: AttendanceState<Client>,
}

impl Context {
    /// Hydrate from the configured server. Input is blocked until this
    /// returns; an unreachable server leaves an empty store.
    pub async fn connect(config: &UniattendConfig) -> Result<Self> {
        let client = Client::new(&config.server_url)?;
        let state = AttendanceState::new(Arc::new(client), config.debounce()?);

        let spinner = create_spinner(format!("Loading attendance from {}", config.server_url));
        state.hydrate().await;
        spinner.finish_and_clear();

        Ok(Self {
            weeks: config.weeks(),
            state,
        })
    }

    pub fn week(&self, week_id: &str) -> Result<&AcademicWeek> {
        Ok(find_week(&self.weeks, week_id)?)
    }

    /// Send everything still queued before the process exits.
    pub async fn flush(&self) {
        let spinner = create_spinner("Syncing".to_string());
        self.state.flush().await;
        spinner.finish_and_clear();
    }
}
