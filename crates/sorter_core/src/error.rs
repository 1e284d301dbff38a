//! Error types for the tournament engine

use thiserror::Error;

use crate::types::ItemId;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SorterError>;

/// Errors surfaced by the tournament engine.
///
/// Planning and initialization errors are fatal: no tournament is created.
/// `InvalidSelection` is recoverable: the pending round stays as it was and
/// the caller can re-prompt with the same candidates.
#[derive(Error, Debug)]
pub enum SorterError {
    /// Invalid item count, provider, or tuning parameter
    #[error("Configuration error: {0}")]
    Config(String),

    /// No eligible items were supplied
    #[error("Catalog contains no eligible items")]
    EmptyCatalog,

    /// Reported winner is not one of the candidates currently on display
    #[error("Invalid selection: {winner} is not a candidate in round {round}")]
    InvalidSelection { winner: ItemId, round: usize },

    /// Reading a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `SorterConfig`
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
