//! Error types for the store and the OANDA client
//!
//! Operations the adapter exposes but does not implement report
//! `StoreError::NotImplemented` so callers can tell them apart from
//! runtime failures.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not implemented: {operation}")]
    NotImplemented { operation: &'static str },

    #[error("Exchange API error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A store is already installed for this process")]
    AlreadyInstalled,

    #[error("Store has been shut down")]
    ShutDown,

    #[error("Unsupported commission scheme: {0}")]
    UnsupportedCommission(String),

    #[error("Sizing error: {0}")]
    Sizing(String),
}

impl StoreError {
    pub fn not_implemented(operation: &'static str) -> Self {
        StoreError::NotImplemented { operation }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, StoreError::NotImplemented { .. })
    }
}

/// Errors raised while talking to the OANDA v20 API
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}
