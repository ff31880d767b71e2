//! Output destinations handed to the logging pipeline.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::FileOutput;
use crate::rotation::RotatingFileSink;

/// In-memory sink that records every write as one string entry.
///
/// The backing vector is shared with the caller, who reads it back with
/// [`SliceSink::entries`] or through their own handle. Appends are
/// serialized by the mutex, so concurrent writers never lose entries.
#[derive(Debug, Clone, Default)]
pub struct SliceSink {
    entries: Arc<Mutex<Vec<String>>>,
}

impl SliceSink {
    /// Create a sink with a fresh, empty backing vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink appending to `target`.
    pub fn with_target(target: Arc<Mutex<Vec<String>>>) -> Self {
        Self { entries: target }
    }

    /// Shared handle to the backing vector.
    pub fn target(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.entries)
    }

    /// Snapshot of everything written so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Write for SliceSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf).into_owned();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where encoded log lines go.
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Rotating log file.
    File(RotatingFileSink),
    /// In-memory capture, mostly for tests.
    Slice(SliceSink),
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(sink) => sink.write(buf),
            Self::Slice(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(sink) => sink.flush(),
            Self::Slice(sink) => sink.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl From<RotatingFileSink> for LogSink {
    fn from(sink: RotatingFileSink) -> Self {
        Self::File(sink)
    }
}

impl From<SliceSink> for LogSink {
    fn from(sink: SliceSink) -> Self {
        Self::Slice(sink)
    }
}

/// Rotating file sink for `output`, rotation handled by `file-rotate`. The
/// file is created on the first write; open failures surface from `write`.
pub fn build_file_sink(output: &FileOutput) -> LogSink {
    LogSink::File(RotatingFileSink::new(
        output.filename.clone(),
        output.rotation_policy(),
    ))
}

/// In-memory sink appending one entry per write to `target`.
pub fn build_slice_sink(target: Arc<Mutex<Vec<String>>>) -> LogSink {
    LogSink::Slice(SliceSink::with_target(target))
}
