//! Error type for configuration and persistence

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while bootstrapping or touching the thumbnail database
#[derive(Error, Debug)]
pub enum Error {
    /// sqlx failure opening the pool or running a cache query
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading the config file or creating the root folder
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparseable TOML, invalid scoring policy or log filter
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data or global state not in the expected shape
    #[error("Internal error: {0}")]
    Internal(String),
}
