use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::EncoderConfig;
use crate::rotation::RotationPolicy;

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity name ("debug", "info", ..., "fatal"). Unknown names mean "info".
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write encoded lines to stdout
    #[serde(default)]
    pub console: bool,
    /// Development mode: dpanic messages panic
    #[serde(default)]
    pub development: bool,
    /// Line layout
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Rotating file output
    pub file: Option<FileOutput>,
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self {
            level: default_log_level(),
            console: false,
            development: false,
            encoder: EncoderConfig::default(),
            file: None,
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: String) -> Self {
        self.level = level;
        self
    }

    /// Enable console logging
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Enable development mode
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Replace the encoder configuration
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set file logging configuration
    pub fn with_file(mut self, file: FileOutput) -> Self {
        self.file = Some(file);
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Rotating file destination.
///
/// Zero values select the rotation defaults: 100 MB files, unlimited
/// backups, no age limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutput {
    /// Path of the active log file
    pub filename: PathBuf,
    /// Size in megabytes before the file is rotated
    #[serde(default)]
    pub max_size: u64,
    /// Number of rotated files to keep
    #[serde(default)]
    pub max_backups: usize,
    /// Days to keep rotated files; only applies when `max_backups` is 0
    #[serde(default)]
    pub max_age: u64,
    /// Gzip rotated files
    #[serde(default)]
    pub compress: bool,
}

impl FileOutput {
    /// Create a new FileOutput with default rotation
    pub fn new<P: Into<PathBuf>>(filename: P) -> Self {
        Self {
            filename: filename.into(),
            max_size: 0,
            max_backups: 0,
            max_age: 0,
            compress: false,
        }
    }

    /// Set the size limit in megabytes
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of backups to keep
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    /// Set the backup age limit in days
    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = max_age;
        self
    }

    /// Enable gzip compression of backups
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Rotation thresholds in the units the rotation component works with.
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::from_units(self.max_size, self.max_backups, self.max_age, self.compress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{TimeEncoding, build_encoder_config};
    use std::time::Duration;

    #[test]
    fn test_log_config_new() {
        let config = LogConfig::new();
        assert_eq!(config.level, "info");
        assert!(!config.console);
        assert!(!config.development);
        assert_eq!(config.encoder, build_encoder_config());
        assert!(config.file.is_none());
    }

    #[test]
    fn test_log_config_default() {
        assert_eq!(LogConfig::default(), LogConfig::new());
    }

    #[test]
    fn test_log_config_with_methods() {
        let config = LogConfig::new()
            .with_level("debug".to_string())
            .with_console(true)
            .with_development(true)
            .with_file(FileOutput::new("test.log"));
        assert_eq!(config.level, "debug");
        assert!(config.console);
        assert!(config.development);
        assert_eq!(
            config.file.as_ref().unwrap().filename,
            PathBuf::from("test.log")
        );
    }

    #[test]
    fn test_file_output_new() {
        let file = FileOutput::new("test.log");
        assert_eq!(file.filename, PathBuf::from("test.log"));
        assert_eq!(file.max_size, 0);
        assert_eq!(file.max_backups, 0);
        assert_eq!(file.max_age, 0);
        assert!(!file.compress);
    }

    #[test]
    fn test_file_output_rotation_policy() {
        let policy = FileOutput::new("test.log")
            .with_max_size(5)
            .with_max_backups(3)
            .with_max_age(28)
            .with_compress(true)
            .rotation_policy();
        assert_eq!(policy.max_size, 5 * 1024 * 1024);
        assert_eq!(policy.max_backups, 3);
        assert_eq!(policy.max_age, Some(Duration::from_secs(28 * 86_400)));
        assert!(policy.compress);
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
level: warn
console: true
file:
  filename: /var/log/app.log
  max_size: 10
  max_backups: 5
  compress: true
"#;
        let config: LogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.level, "warn");
        assert!(config.console);
        assert!(!config.development);
        assert_eq!(config.encoder, build_encoder_config());
        let file = config.file.unwrap();
        assert_eq!(file.filename, PathBuf::from("/var/log/app.log"));
        assert_eq!(file.max_size, 10);
        assert_eq!(file.max_backups, 5);
        assert_eq!(file.max_age, 0);
        assert!(file.compress);
    }

    #[test]
    fn test_deserialize_toml() {
        let toml_str = r#"
development = true

[encoder]
time_encoding = "epoch_millis"

[file]
filename = "logs/app.log"
max_age = 7
"#;
        let config: LogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.level, "info");
        assert!(config.development);
        assert_eq!(config.encoder.time_encoding, TimeEncoding::EpochMillis);
        assert_eq!(config.encoder.message_key, "msg");
        assert_eq!(config.file.unwrap().max_age, 7);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::new());
    }
}
