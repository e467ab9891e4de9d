//! Error types for the game core and for configuration files.

use thiserror::Error;

/// Validation errors reported synchronously to the caller. None are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("need at least {required} players to form a group, have {available}")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("player name must not be blank")]
    InvalidPlayerName,

    #[error("a game is already running")]
    AlreadyRunning,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] GameError),
}
