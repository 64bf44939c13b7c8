//! Nessview Core - Foundation types shared across the nessview crates
//!
//! This crate provides the pieces every other nessview crate builds on:
//! - `Severity`: the four classification buckets a scan report uses
//! - `Error` / `Result`: typed error handling for parsing and loading
//! - Logging initialization built on `tracing`

pub mod error;
pub mod logging;
pub mod severity;

pub use error::{Error, Result};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use severity::Severity;
