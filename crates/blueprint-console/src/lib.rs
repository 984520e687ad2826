//! Lightweight, dependency-free leveled logging, split out from the
//! compiler/executor so the core crates can use `tracing` spans
//! internally while the dry-run pending-queries drain and CLI-facing
//! diagnostics use a small hand-rolled logger instead.

pub mod logging;

pub use logging::{init_logging, is_logging_enabled, min_log_level, set_log_level, LogLevel};
