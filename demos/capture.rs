//! Capturing log output in memory, the way tests do.

use std::sync::{Arc, Mutex};

use zaplog::{LogConfig, Severity, build_slice_sink, emit, subscriber};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let config = LogConfig::new().with_level("warn".to_string());
    let subscriber = subscriber(&config, build_slice_sink(Arc::clone(&lines)))?;

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("below the threshold");
        tracing::warn!(disk = "/dev/sda1", "disk almost full");
        emit(Severity::DPanic, "index out of sync");
    });

    for line in lines.lock().map_err(|e| e.to_string())?.iter() {
        print!("{line}");
    }

    Ok(())
}
