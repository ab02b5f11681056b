//! Configuration shared by the server and the CLI.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AttendError, AttendResult};
use crate::schedule::{
    AcademicWeek, DEFAULT_START_DATE, DEFAULT_TEMPLATE, DEFAULT_WEEK_COUNT, generate_weeks,
};

pub const DEFAULT_PORT: u16 = 3000;

static DEFAULT_DEBOUNCE: &str = "400ms";

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_server_url() -> String {
    format!("http://127.0.0.1:{}", DEFAULT_PORT)
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("uniattend")
        .join("attendance.json")
}

fn default_debounce() -> String {
    DEFAULT_DEBOUNCE.to_string()
}

fn default_weeks() -> usize {
    DEFAULT_WEEK_COUNT
}

fn default_start_date() -> NaiveDate {
    DEFAULT_START_DATE
}

/// Configuration at ~/.config/uniattend/config.toml, overridable with
/// `UNIATTEND_*` environment variables (and `PORT` for the listen port).
#[derive(Debug, Deserialize, Clone)]
pub struct UniattendConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    /// Base URL the CLI talks to.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// JSON document holding the whole store.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory with a web front-end to serve next to the API.
    pub static_dir: Option<PathBuf>,

    /// Quiet window of the delta sync debounce, e.g. "400ms".
    #[serde(default = "default_debounce")]
    pub debounce: String,

    #[serde(default = "default_weeks")]
    pub weeks: usize,

    /// Monday of the first academic week.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

impl Default for UniattendConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            server_url: default_server_url(),
            data_file: default_data_file(),
            static_dir: None,
            debounce: default_debounce(),
            weeks: default_weeks(),
            start_date: default_start_date(),
        }
    }
}

impl UniattendConfig {
    pub fn config_path() -> AttendResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AttendError::Config("Could not determine config directory".into()))?
            .join("uniattend");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file is not an error.
    pub fn load() -> AttendResult<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> AttendResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("UNIATTEND"))
            .set_override_option("port", std::env::var("PORT").ok())
            .map_err(|e| AttendError::Config(e.to_string()))?
            .build()
            .map_err(|e| AttendError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AttendError::Config(e.to_string()))
    }

    pub fn data_file(&self) -> PathBuf {
        expand(&self.data_file)
    }

    pub fn static_dir(&self) -> Option<PathBuf> {
        self.static_dir.as_deref().map(expand)
    }

    pub fn debounce(&self) -> AttendResult<Duration> {
        humantime::parse_duration(&self.debounce).map_err(|e| {
            AttendError::Config(format!("invalid debounce '{}': {}", self.debounce, e))
        })
    }

    /// The academic weeks described by this configuration.
    pub fn weeks(&self) -> Vec<AcademicWeek> {
        generate_weeks(self.weeks, self.start_date, DEFAULT_TEMPLATE)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
