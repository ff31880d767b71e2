//! Recording messages at severities `tracing` has no level for.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::Severity;
use crate::level::{DPANIC_TARGET, FATAL_TARGET, PANIC_TARGET};

static DEVELOPMENT: AtomicBool = AtomicBool::new(false);

/// Turn development mode on or off. [`crate::init_logging`] sets it from the config.
pub fn set_development(enabled: bool) {
    DEVELOPMENT.store(enabled, Ordering::Relaxed);
}

pub fn is_development() -> bool {
    DEVELOPMENT.load(Ordering::Relaxed)
}

/// What happens after a message has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consequence {
    Continue,
    Panic,
    Exit,
}

impl Consequence {
    pub fn of(severity: Severity, development: bool) -> Self {
        match severity {
            Severity::DPanic if development => Self::Panic,
            Severity::Panic => Self::Panic,
            Severity::Fatal => Self::Exit,
            _ => Self::Continue,
        }
    }
}

/// Record `message` at `severity`, then apply the severity's side effect.
///
/// `Panic` (and `DPanic` in development mode) panics with the message.
/// `Fatal` flushes the file writer and exits the process with status 1.
pub fn emit(severity: Severity, message: &str) {
    match severity {
        Severity::Debug => tracing::debug!("{message}"),
        Severity::Info => tracing::info!("{message}"),
        Severity::Warn => tracing::warn!("{message}"),
        Severity::Error => tracing::error!("{message}"),
        Severity::DPanic => tracing::error!(target: DPANIC_TARGET, "{message}"),
        Severity::Panic => tracing::error!(target: PANIC_TARGET, "{message}"),
        Severity::Fatal => tracing::error!(target: FATAL_TARGET, "{message}"),
    }

    match Consequence::of(severity, is_development()) {
        Consequence::Continue => {}
        Consequence::Panic => panic!("{message}"),
        Consequence::Exit => {
            crate::shutdown();
            std::process::exit(1);
        }
    }
}
