//! Orchestration for the `palletrack` binary: environment config and the
//! JSON-lines script runner.

pub mod config;
pub mod script;

pub use config::AppConfig;
pub use script::{RunSummary, ScriptCommand, ScriptRunner};
