//! Core types for the uniattend ecosystem.
//!
//! This crate provides the types shared by uniattend-server and uniattend-cli:
//! - `attendance` for the week → session → code store
//! - `protocol` for the HTTP/JSON wire format
//! - `schedule` for generating the academic weeks the codes belong to
//! - `export` for backups and the plain-text week summary

pub mod attendance;
pub mod config;
pub mod error;
pub mod export;
pub mod protocol;
pub mod schedule;

pub use attendance::{AttendanceStore, FieldDivergence, WeekRecord, normalize_code};
pub use error::{AttendError, AttendResult};
