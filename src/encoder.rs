//! Encoder configuration: how a log record is rendered into a JSON line.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::Severity;

/// How the record timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
    /// Floating point seconds since the Unix epoch.
    EpochSeconds,
    /// Integer milliseconds since the Unix epoch.
    EpochMillis,
    /// `2026-01-09T14:03:27.512+0800`, or `...27.512Z` in UTC.
    Iso8601,
    /// RFC 3339 with full sub-second precision.
    Rfc3339,
}

/// How the severity is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    /// `info`
    Lowercase,
    /// `INFO`
    Capital,
}

/// How the call site is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerEncoding {
    /// Last directory and file name: `src/main.rs:12`
    Short,
    /// Full path as recorded by the compiler.
    Full,
}

/// Field names and encodings for a rendered log line.
///
/// An empty key omits that field from the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    /// Name of the enclosing span, which `#[instrument]` names after the function.
    pub function_key: String,
    /// Backtrace of error-and-above records, when `RUST_BACKTRACE` enables capture.
    pub stacktrace_key: String,
    pub line_ending: String,
    pub time_encoding: TimeEncoding,
    pub level_encoding: LevelEncoding,
    pub caller_encoding: CallerEncoding,
}

impl EncoderConfig {
    /// Baseline preset: machine-oriented keys, epoch timestamps, lowercase levels.
    pub fn production() -> Self {
        Self {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            function_key: String::new(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            time_encoding: TimeEncoding::EpochSeconds,
            level_encoding: LevelEncoding::Lowercase,
            caller_encoding: CallerEncoding::Short,
        }
    }

    /// Render one record as a JSON object followed by the line ending.
    ///
    /// Keys appear in the order level, time, logger, caller, function, message,
    /// stacktrace, then the record's own fields. Record fields never overwrite
    /// the reserved keys.
    pub fn encode(&self, entry: &Entry) -> String {
        let mut object = Map::new();

        if !self.level_key.is_empty() {
            object.insert(self.level_key.clone(), Value::from(self.encode_level(entry.severity)));
        }
        if !self.time_key.is_empty() {
            object.insert(self.time_key.clone(), self.encode_time(entry.time));
        }
        if !self.name_key.is_empty() && !entry.logger.is_empty() {
            object.insert(self.name_key.clone(), Value::from(entry.logger.clone()));
        }
        if !self.caller_key.is_empty()
            && let Some((file, line)) = &entry.caller
        {
            object.insert(self.caller_key.clone(), Value::from(self.encode_caller(file, *line)));
        }
        if !self.function_key.is_empty()
            && let Some(function) = &entry.function
        {
            object.insert(self.function_key.clone(), Value::from(function.clone()));
        }
        if !self.message_key.is_empty() {
            object.insert(self.message_key.clone(), Value::from(entry.message.clone()));
        }
        if !self.stacktrace_key.is_empty()
            && let Some(stacktrace) = &entry.stacktrace
        {
            object.insert(self.stacktrace_key.clone(), Value::from(stacktrace.clone()));
        }
        for (key, value) in &entry.fields {
            if !object.contains_key(key) {
                object.insert(key.clone(), value.clone());
            }
        }

        let mut line = Value::Object(object).to_string();
        line.push_str(&self.line_ending);
        line
    }

    fn encode_level(&self, severity: Severity) -> &'static str {
        match self.level_encoding {
            LevelEncoding::Lowercase => severity.as_str(),
            LevelEncoding::Capital => severity.as_capital_str(),
        }
    }

    fn encode_time(&self, time: OffsetDateTime) -> Value {
        let epoch_seconds = || Value::from(time.unix_timestamp_nanos() as f64 / 1_000_000_000.0);
        match self.time_encoding {
            TimeEncoding::EpochSeconds => epoch_seconds(),
            TimeEncoding::EpochMillis => {
                Value::from((time.unix_timestamp_nanos() / 1_000_000) as i64)
            }
            TimeEncoding::Iso8601 => {
                let formatted = if time.offset().is_utc() {
                    time.format(format_description!(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                    ))
                } else {
                    time.format(format_description!(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
                    ))
                };
                formatted.map(Value::from).unwrap_or_else(|_| epoch_seconds())
            }
            TimeEncoding::Rfc3339 => time
                .format(&Rfc3339)
                .map(Value::from)
                .unwrap_or_else(|_| epoch_seconds()),
        }
    }

    fn encode_caller(&self, file: &str, line: u32) -> String {
        match self.caller_encoding {
            CallerEncoding::Full => format!("{file}:{line}"),
            CallerEncoding::Short => format!("{}:{line}", short_path(file)),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        build_encoder_config()
    }
}

/// The encoder configuration used by this crate's pipeline: the production
/// preset with ISO-8601 timestamps and uppercase levels.
pub fn build_encoder_config() -> EncoderConfig {
    EncoderConfig {
        time_encoding: TimeEncoding::Iso8601,
        level_encoding: LevelEncoding::Capital,
        ..EncoderConfig::production()
    }
}

/// A log record ready for encoding.
#[derive(Debug, Clone)]
pub struct Entry {
    pub time: OffsetDateTime,
    pub severity: Severity,
    /// Logger name; the event target when built from `tracing`.
    pub logger: String,
    pub caller: Option<(String, u32)>,
    pub function: Option<String>,
    pub message: String,
    pub stacktrace: Option<String>,
    pub fields: Map<String, Value>,
}

fn short_path(file: &str) -> &str {
    let mut separators = file.rmatch_indices(['/', '\\']);
    match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn entry() -> Entry {
        let mut fields = Map::new();
        fields.insert("user".to_string(), Value::from("alice"));
        fields.insert("attempt".to_string(), Value::from(3));
        Entry {
            time: datetime!(2026-01-09 14:03:27.512 +08:00),
            severity: Severity::Warn,
            logger: "app::auth".to_string(),
            caller: Some(("crates/app/src/auth.rs".to_string(), 42)),
            function: Some("authenticate".to_string()),
            message: "login failed".to_string(),
            stacktrace: None,
            fields,
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build_encoder_config(), build_encoder_config());
        assert_eq!(EncoderConfig::default(), build_encoder_config());
    }

    #[test]
    fn test_build_overrides_production_preset() {
        let production = EncoderConfig::production();
        let config = build_encoder_config();
        assert_eq!(production.time_encoding, TimeEncoding::EpochSeconds);
        assert_eq!(production.level_encoding, LevelEncoding::Lowercase);
        assert_eq!(config.time_encoding, TimeEncoding::Iso8601);
        assert_eq!(config.level_encoding, LevelEncoding::Capital);
        assert_eq!(config.message_key, production.message_key);
        assert_eq!(config.caller_encoding, production.caller_encoding);
    }

    #[test]
    fn test_encode_default_layout() {
        let line = build_encoder_config().encode(&entry());
        assert_eq!(
            line,
            "{\"level\":\"WARN\",\"ts\":\"2026-01-09T14:03:27.512+0800\",\"logger\":\"app::auth\",\
             \"caller\":\"src/auth.rs:42\",\"msg\":\"login failed\",\"user\":\"alice\",\"attempt\":3}\n"
        );
    }

    #[test]
    fn test_iso8601_utc_uses_z() {
        let mut e = entry();
        e.time = datetime!(2026-01-09 06:03:27.512 UTC);
        let value: Value = serde_json::from_str(build_encoder_config().encode(&e).trim_end()).unwrap();
        assert_eq!(value["ts"], "2026-01-09T06:03:27.512Z");

        e.time = datetime!(2026-01-09 01:03:27.512 -05:00);
        let value: Value = serde_json::from_str(build_encoder_config().encode(&e).trim_end()).unwrap();
        assert_eq!(value["ts"], "2026-01-09T01:03:27.512-0500");
    }

    #[test]
    fn test_production_preset_keys() {
        let config = EncoderConfig::production();
        assert_eq!(config.message_key, "msg");
        assert_eq!(config.level_key, "level");
        assert_eq!(config.time_key, "ts");
        assert_eq!(config.name_key, "logger");
        assert_eq!(config.caller_key, "caller");
        assert_eq!(config.function_key, "");
        assert_eq!(config.stacktrace_key, "stacktrace");
        assert_eq!(config.line_ending, "\n");
    }

    #[test]
    fn test_function_and_stacktrace_keys() {
        let mut e = entry();
        e.stacktrace = Some("0: app::auth::authenticate".to_string());

        // Preset leaves the function out
        let value: Value = serde_json::from_str(build_encoder_config().encode(&e).trim_end()).unwrap();
        assert!(value.get("function").is_none());
        assert_eq!(value["stacktrace"], "0: app::auth::authenticate");

        let config = EncoderConfig {
            function_key: "func".to_string(),
            ..build_encoder_config()
        };
        let line = config.encode(&e);
        assert!(line.contains("\"caller\":\"src/auth.rs:42\",\"func\":\"authenticate\",\"msg\":\"login failed\",\"stacktrace\":"));

        let config = EncoderConfig {
            stacktrace_key: String::new(),
            ..build_encoder_config()
        };
        let value: Value = serde_json::from_str(config.encode(&e).trim_end()).unwrap();
        assert!(value.get("stacktrace").is_none());
    }

    #[test]
    fn test_encode_production_layout() {
        let line = EncoderConfig::production().encode(&entry());
        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["level"], "warn");
        assert!(value["ts"].is_f64());
        assert_eq!(value["ts"].as_f64().unwrap().floor(), 1767938607.0);
    }

    #[test]
    fn test_empty_key_omits_field() {
        let config = EncoderConfig {
            caller_key: String::new(),
            time_key: String::new(),
            ..build_encoder_config()
        };
        let line = config.encode(&entry());
        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert!(value.get("caller").is_none());
        assert!(value.get("ts").is_none());
        assert_eq!(value["msg"], "login failed");
    }

    #[test]
    fn test_fields_do_not_overwrite_reserved_keys() {
        let mut e = entry();
        e.fields.insert("msg".to_string(), Value::from("spoofed"));
        let line = build_encoder_config().encode(&e);
        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["msg"], "login failed");
    }

    #[test]
    fn test_other_time_encodings() {
        let mut config = build_encoder_config();
        config.time_encoding = TimeEncoding::EpochMillis;
        let value: Value = serde_json::from_str(config.encode(&entry()).trim_end()).unwrap();
        assert_eq!(value["ts"], 1767938607512i64);

        config.time_encoding = TimeEncoding::Rfc3339;
        let value: Value = serde_json::from_str(config.encode(&entry()).trim_end()).unwrap();
        let ts = value["ts"].as_str().unwrap();
        assert!(ts.starts_with("2026-01-09T14:03:27.512"), "ts: {ts}");
        assert!(ts.ends_with("+08:00"), "ts: {ts}");
    }

    #[test]
    fn test_caller_encodings() {
        let config = build_encoder_config();
        assert_eq!(config.encode_caller("src/lib.rs", 7), "src/lib.rs:7");
        assert_eq!(config.encode_caller("lib.rs", 7), "lib.rs:7");
        assert_eq!(config.encode_caller("a/b/c/d.rs", 1), "c/d.rs:1");

        let full = EncoderConfig {
            caller_encoding: CallerEncoding::Full,
            ..build_encoder_config()
        };
        assert_eq!(full.encode_caller("a/b/c/d.rs", 1), "a/b/c/d.rs:1");
    }

    #[test]
    fn test_custom_line_ending() {
        let config = EncoderConfig {
            line_ending: "\r\n".to_string(),
            ..build_encoder_config()
        };
        assert!(config.encode(&entry()).ends_with("}\r\n"));
    }

    #[test]
    fn test_deserialize_partial_overrides() {
        let yaml = r#"
message_key: message
time_encoding: rfc3339
"#;
        let config: EncoderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.message_key, "message");
        assert_eq!(config.time_encoding, TimeEncoding::Rfc3339);
        assert_eq!(config.level_encoding, LevelEncoding::Capital);
        assert_eq!(config.level_key, "level");
    }
}
