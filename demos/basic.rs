//! Console logging with the default encoder.
//!
//! Prints one JSON object per line with an ISO-8601 timestamp and an
//! uppercase level.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    zaplog::builder()
        .with_console(true)
        .with_level("debug")
        .init()?;

    tracing::debug!("This is a debug message");
    tracing::info!(user = "alice", "This is an info message");
    tracing::warn!(retries = 3, "This is a warning message");
    tracing::error!("This is an error message");

    Ok(())
}
