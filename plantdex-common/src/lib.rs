//! # PlantDex Common Library
//!
//! Shared code for the PlantDex crates:
//! - Error type used by persistence and configuration
//! - Bootstrap configuration loading and root folder resolution
//! - Logging initialization
//! - SQLite database initialization

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
