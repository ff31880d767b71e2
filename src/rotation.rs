//! File output whose rotation is handled by `file-rotate`.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};

/// Default size limit when none is configured, in megabytes.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const MEGABYTE: u64 = 1024 * 1024;

/// Retention and rotation thresholds for a [`RotatingFileSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum size of the active file in bytes before it is rotated.
    pub max_size: u64,
    /// Maximum number of backups to keep. Zero keeps all of them.
    pub max_backups: usize,
    /// Backups older than this are deleted.
    pub max_age: Option<Duration>,
    /// Gzip backups after rotation.
    pub compress: bool,
}

impl RotationPolicy {
    /// Build a policy from the user-facing units: megabytes and days.
    ///
    /// A zero size falls back to [`DEFAULT_MAX_SIZE_MB`], a zero age disables
    /// age-based pruning.
    pub fn from_units(max_size_mb: u64, max_backups: usize, max_age_days: u64, compress: bool) -> Self {
        let max_size_mb = if max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            max_size_mb
        };
        Self {
            max_size: max_size_mb.saturating_mul(MEGABYTE),
            max_backups,
            max_age: (max_age_days > 0).then(|| Duration::from_secs(max_age_days.saturating_mul(24 * 60 * 60))),
            compress,
        }
    }

    /// Rotate after the write that crosses the size limit, so a line is
    /// never split between two files.
    pub fn content_limit(&self) -> ContentLimit {
        ContentLimit::BytesSurpassed(usize::try_from(self.max_size).unwrap_or(usize::MAX).max(1))
    }

    /// Which backups survive a rotation. A backup count takes precedence
    /// over an age limit; an age too large to represent keeps everything.
    pub fn file_limit(&self) -> FileLimit {
        match (self.max_backups, self.max_age) {
            (0, Some(age)) => chrono::Duration::from_std(age).map_or(FileLimit::Unlimited, FileLimit::Age),
            (0, None) => FileLimit::Unlimited,
            (count, _) => FileLimit::MaxFiles(count),
        }
    }

    pub fn compression(&self) -> Compression {
        if self.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        }
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_units(0, 0, 0, false)
    }
}

/// Rotating log file.
///
/// Backups are named after the active file plus a timestamp suffix
/// (`app.log.20260109T140327`, `.gz` when compressed). Nothing touches the
/// filesystem until the first write, which creates parent directories as
/// needed. Clones share the same writer.
#[derive(Clone)]
pub struct RotatingFileSink {
    path: PathBuf,
    policy: RotationPolicy,
    writer: Arc<Mutex<Option<FileRotate<AppendTimestamp>>>>,
}

impl RotatingFileSink {
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn open(&self) -> io::Result<FileRotate<AppendTimestamp>> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(FileRotate::new(
            &self.path,
            AppendTimestamp::default(self.policy.file_limit()),
            self.policy.content_limit(),
            self.policy.compression(),
            #[cfg(unix)]
            None,
        ))
    }
}

impl Write for RotatingFileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let writer = match slot.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        slot.insert(writer).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut slot = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
