//! Narrow error type for the engine (spec §7).
//!
//! Only `InvalidInput` and `ConfigurationError` are constructible — every
//! other failure mode (provider faults, LLM faults, a slot yielding no
//! candidates) is absorbed locally and never becomes an `EngineError`. The
//! task shell is the only caller that turns a terminal `EngineError` into a
//! plan's `last_error_code`.

use std::fmt;

#[derive(Debug, Clone)]
pub enum EngineError {
    InvalidInput(String),
    ConfigurationError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            EngineError::ConfigurationError(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Stable name used as `last_error_code` on the plan row.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "InvalidInput",
            EngineError::ConfigurationError(_) => "ConfigurationError",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
