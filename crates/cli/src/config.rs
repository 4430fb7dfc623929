//! Environment configuration.

use std::str::FromStr;
use std::time::Duration;

use palletrack_inventory::BatchMode;
use palletrack_observability::{LogConfig, LogFormat};

pub const LOG_ENV: &str = "PALLETRACK_LOG";
pub const LOG_FORMAT_ENV: &str = "PALLETRACK_LOG_FORMAT";
pub const RECENT_ENTRIES_ENV: &str = "PALLETRACK_RECENT_ENTRIES";
pub const SUGGESTION_TIMEOUT_ENV: &str = "PALLETRACK_SUGGESTION_TIMEOUT_MS";
pub const BATCH_MODE_ENV: &str = "PALLETRACK_BATCH_MODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log: LogConfig,
    /// How many entries the dashboard lists as recent.
    pub recent_entries: usize,
    pub suggestion_timeout: Duration,
    /// Default mode for `pick` steps that do not name one.
    pub batch_mode: BatchMode,
    /// Values that were set but could not be used. They are reported once
    /// logging is up.
    pub rejected: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            recent_entries: 5,
            suggestion_timeout: Duration::from_millis(5_000),
            batch_mode: BatchMode::default(),
            rejected: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.log.filter = filter;
        }
        if let Some(format) = parse::<LogFormat>(&lookup, LOG_FORMAT_ENV, &mut config.rejected) {
            config.log.format = format;
        }
        if let Some(recent) = parse::<usize>(&lookup, RECENT_ENTRIES_ENV, &mut config.rejected) {
            config.recent_entries = recent;
        }
        if let Some(ms) = parse::<u64>(&lookup, SUGGESTION_TIMEOUT_ENV, &mut config.rejected) {
            config.suggestion_timeout = Duration::from_millis(ms);
        }
        if let Some(mode) = parse::<BatchMode>(&lookup, BATCH_MODE_ENV, &mut config.rejected) {
            config.batch_mode = mode;
        }

        config
    }

    pub fn report_rejected(&self) {
        for problem in &self.rejected {
            tracing::warn!("{problem}; using default");
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, rejected: &mut Vec<String>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            rejected.push(format!("{key}={raw:?} is invalid: {e}"));
            None
        }
    }
}
