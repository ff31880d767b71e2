//! # Zaplog
//!
//! Structured JSON logging for the `tracing` ecosystem.
//!
//! ## Features
//!
//! - Level names resolved fail-soft: anything unknown means `info`
//! - One JSON object per line, with configurable keys and encodings
//! - Rotating file output (size trigger, backup count or age, gzip) via `file-rotate`
//! - In-memory capture sink for tests
//! - `dpanic`, `panic` and `fatal` severities with their side effects
//!
//! ## Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use zaplog::{LogConfig, build_slice_sink, subscriber};
//!
//! let lines = Arc::new(Mutex::new(Vec::new()));
//! let subscriber = subscriber(&LogConfig::new(), build_slice_sink(lines.clone()))?;
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(user = "alice", "signed in");
//! });
//!
//! assert!(lines.lock().unwrap()[0].contains("\"level\":\"INFO\""));
//! # Ok::<(), zaplog::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod emit;
pub mod encoder;
pub mod error;
pub mod format;
pub mod level;
pub mod rotation;
pub mod sink;
pub mod tracing_init;

pub use builder::LogBuilder;
pub use config::{FileOutput, LogConfig};
pub use emit::emit;
pub use encoder::{CallerEncoding, EncoderConfig, LevelEncoding, TimeEncoding, build_encoder_config};
pub use error::{Error, Result};
pub use level::{Severity, resolve_level};
pub use rotation::{RotatingFileSink, RotationPolicy};
pub use sink::{LogSink, SliceSink, build_file_sink, build_slice_sink};
pub use tracing_init::{init_logging, shutdown, subscriber};

/// Start building a logging configuration.
pub fn builder() -> LogBuilder {
    LogBuilder::new()
}
