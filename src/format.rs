//! `tracing-subscriber` event formatter driven by an [`EncoderConfig`].

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{self, Write as _};

use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::encoder::{EncoderConfig, Entry};
use crate::level::{DPANIC_TARGET, FATAL_TARGET, PANIC_TARGET, Severity};

/// Renders each event as one JSON line.
#[derive(Debug, Clone)]
pub struct EncodedFormat {
    config: EncoderConfig,
}

impl EncodedFormat {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Error-and-above records carry a backtrace when capture is enabled
    /// (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    fn stacktrace(&self, severity: Severity) -> Option<String> {
        if severity < Severity::Error || self.config.stacktrace_key.is_empty() {
            return None;
        }
        let backtrace = Backtrace::capture();
        (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
    }
}

impl<S, N> FormatEvent<S, N> for EncodedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let severity = Severity::of(metadata);
        let entry = Entry {
            time: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
            severity,
            logger: logger_name(metadata.target()).to_string(),
            caller: metadata
                .file()
                .zip(metadata.line())
                .map(|(file, line)| (file.to_string(), line)),
            function: ctx.lookup_current().map(|span| span.name().to_string()),
            message: visitor.message,
            stacktrace: self.stacktrace(severity),
            fields: visitor.fields,
        };

        writer.write_str(&self.config.encode(&entry))
    }
}

/// Severity targets carry no logger name of their own.
fn logger_name(target: &str) -> &str {
    match target {
        DPANIC_TARGET | PANIC_TARGET | FATAL_TARGET => "",
        other => other,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{value:?}")));
    }
}
