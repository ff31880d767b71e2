use once_cell::sync::Lazy;
use std::sync::{Mutex, PoisonError};
use tracing::{Metadata, Subscriber};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::filter::{FilterFn, filter_fn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::format::EncodedFormat;
use crate::{EncoderConfig, Error, LogConfig, LogSink, Result, Severity, build_file_sink, resolve_level};

static LOG_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Install the global subscriber described by `config`.
///
/// Encoded lines go to stdout when `console` is set and to the rotating
/// file when `file` is set, the latter through a background worker. The
/// worker never drops lines: when its queue is full, the logging thread
/// waits. A non-empty `RUST_LOG` replaces the configured level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    if let Some(file) = &config.file
        && file.filename.as_os_str().is_empty()
    {
        return Err(Error::Config("file output requires a filename".to_string()));
    }

    let env_filter = env_override(std::env::var("RUST_LOG").ok().as_deref())?;
    let level_filter = env_filter
        .is_none()
        .then(|| severity_filter(resolve_level(&config.level)));

    let console_layer = config
        .console
        .then(|| encoded_layer(&config.encoder, std::io::stdout));

    let (file_layer, guard) = match &config.file {
        Some(file) => {
            let (non_blocking, guard) = NonBlockingBuilder::default()
                .lossy(false)
                .thread_name("zaplog-file")
                .finish(build_file_sink(file));
            (Some(encoded_layer(&config.encoder, non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Init(e.to_string()))?;

    if let Some(guard) = guard {
        *LOG_GUARD.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
    }
    crate::emit::set_development(config.development);

    tracing::debug!(threshold = %resolve_level(&config.level), "logging initialized");
    Ok(())
}

/// Build a subscriber for `config` writing to `sink`, without installing it.
///
/// Useful with `tracing::subscriber::with_default` to capture output in
/// tests through a [`crate::SliceSink`]. `console` and `file` are ignored,
/// and so is `RUST_LOG`: the threshold is always `config.level`.
pub fn subscriber(config: &LogConfig, sink: LogSink) -> Result<Box<dyn Subscriber + Send + Sync>> {
    let subscriber = tracing_subscriber::registry()
        .with(severity_filter(resolve_level(&config.level)))
        .with(encoded_layer(&config.encoder, sink));

    Ok(Box::new(subscriber))
}

/// Flush and stop the background file writer, if one was started.
pub fn shutdown() {
    let guard = LOG_GUARD
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    drop(guard);
}

/// Drop everything below `threshold`.
pub fn severity_filter(threshold: Severity) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    filter_fn(move |metadata| Severity::of(metadata) >= threshold)
}

fn encoded_layer<S, W>(encoder: &EncoderConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(EncodedFormat::new(encoder.clone()))
        .with_ansi(false)
        .with_writer(writer)
        .boxed()
}

/// `EnvFilter` for a non-empty `RUST_LOG` value.
fn env_override(rust_log: Option<&str>) -> Result<Option<EnvFilter>> {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map(Some)
            .map_err(|e| Error::Init(e.to_string())),
        _ => Ok(None),
    }
}
