//! Daytally - daily and recurring task tracking with completion analytics.
//!
//! This library provides the core functionality for the `dt` CLI tool:
//! task definitions and their per-day instances, completion tracking,
//! soft archival of recurring tasks, and point-weighted statistics.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod storage;


/// Library-level error type for Daytally operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not initialized: run `dt system init` first")]
    NotInitialized,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Daytally operations.
pub type Result<T> = std::result::Result<T, Error>;
