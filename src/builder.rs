//! Builder pattern for initializing logging configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! // Rotating JSON log file, 10 MB per file, a week of compressed backups
//! zaplog::builder()
//!     .with_level("debug")
//!     .with_file_output(
//!         zaplog::FileOutput::new("/var/log/app.log")
//!             .with_max_size(10)
//!             .with_max_age(7)
//!             .with_compress(true),
//!     )
//!     .init()
//!     .expect("Failed to initialize logging");
//! ```

use crate::init_logging;
use crate::{EncoderConfig, FileOutput, LogConfig, Result};
use std::path::PathBuf;

/// A builder for configuring and initializing logging.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    config: LogConfig,
}

impl LogBuilder {
    /// Create a new LogBuilder with default configuration.
    pub fn new() -> Self {
        Self {
            config: LogConfig::new(),
        }
    }

    /// Create a LogBuilder from an existing configuration.
    pub fn from_config(config: LogConfig) -> Self {
        Self { config }
    }

    /// Set the minimum severity ("debug", "info", "warn", "error", "dpanic", "panic", "fatal").
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config = self.config.with_level(level.into());
        self
    }

    /// Enable or disable console logging.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config = self.config.with_console(enabled);
        self
    }

    /// Enable or disable development mode.
    pub fn with_development(mut self, enabled: bool) -> Self {
        self.config = self.config.with_development(enabled);
        self
    }

    /// Log to a file with the default rotation settings.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_file(FileOutput::new(path));
        self
    }

    /// Log to a file with custom rotation settings.
    pub fn with_file_output(mut self, file: FileOutput) -> Self {
        self.config = self.config.with_file(file);
        self
    }

    /// Replace the encoder configuration.
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.config = self.config.with_encoder(encoder);
        self
    }

    /// Get the current configuration without initializing.
    pub fn build(self) -> LogConfig {
        self.config
    }

    /// Initialize logging with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The global subscriber is already initialized
    /// - `RUST_LOG` holds an invalid directive
    pub fn init(self) -> Result<()> {
        init_logging(&self.config)
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
