use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum BetSeerError {
    #[error("Invalid signal '{name}': {reason}")]
    InvalidSignal { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Signal provider error: {0}")]
    Provider(String),
}

impl BetSeerError {
    pub fn invalid_signal(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSignal {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn provider_error(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BetSeerError>;
