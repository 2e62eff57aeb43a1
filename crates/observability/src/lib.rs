//! Tracing/logging setup shared by the binaries.

pub mod config;
pub mod subscriber;

pub use config::{LogConfig, LogConfigError, LogFormat};
pub use subscriber::{init, init_with};
