//! Shared utilities for the barangay portal client.

pub mod logging;

pub use logging::{init_logging, LogFormat};
