//! Shared test helpers

pub mod log_capture;

pub use log_capture::capture_logs;
