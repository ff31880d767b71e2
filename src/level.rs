//! Severity levels and level-name resolution.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{Level, Metadata};

/// Target used for events recorded at [`Severity::DPanic`].
pub const DPANIC_TARGET: &str = "zaplog::dpanic";
/// Target used for events recorded at [`Severity::Panic`].
pub const PANIC_TARGET: &str = "zaplog::panic";
/// Target used for events recorded at [`Severity::Fatal`].
pub const FATAL_TARGET: &str = "zaplog::fatal";

/// Ordered log severity.
///
/// The three levels above `Error` have side effects when emitted through
/// [`crate::emit`]: `DPanic` panics in development mode, `Panic` panics and
/// `Fatal` terminates the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Verbose diagnostics, usually disabled in production.
    Debug,
    /// Default level.
    Info,
    /// More important than info, but needs no individual review.
    Warn,
    /// High priority. A healthy application should not produce these.
    Error,
    /// Particularly bad errors. Panics in development mode.
    DPanic,
    /// Panics after the message is recorded.
    Panic,
    /// Exits the process after the message is recorded.
    Fatal,
}

static LEVELS: Lazy<HashMap<&'static str, Severity>> =
    Lazy::new(|| Severity::ALL.iter().map(|s| (s.as_str(), *s)).collect());

/// Resolve a level name, falling back to [`Severity::Info`] for anything unknown.
///
/// Matching is exact: `"DEBUG"` or `" debug"` resolve to `Info`.
pub fn resolve_level(name: &str) -> Severity {
    LEVELS.get(name).copied().unwrap_or(Severity::Info)
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Lowercase name, as accepted by [`resolve_level`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::DPanic => "dpanic",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Uppercase name used by capital level encoding.
    pub fn as_capital_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::DPanic => "DPANIC",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }

    /// The `tracing` level events of this severity are recorded at.
    pub fn tracing_level(&self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error | Self::DPanic | Self::Panic | Self::Fatal => Level::ERROR,
        }
    }

    /// Severity of a `tracing` callsite.
    pub fn of(metadata: &Metadata<'_>) -> Severity {
        match metadata.target() {
            DPANIC_TARGET => Self::DPanic,
            PANIC_TARGET => Self::Panic,
            FATAL_TARGET => Self::Fatal,
            _ => Self::from(*metadata.level()),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE | Level::DEBUG => Self::Debug,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warn,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
