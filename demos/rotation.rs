use zaplog::{FileOutput, LogConfig, init_logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let log_path = temp_dir.path().join("app.log");

    let file = FileOutput::new(&log_path)
        .with_max_size(1) // 1 MB
        .with_max_backups(3)
        .with_max_age(7)
        .with_compress(true);

    let config = LogConfig::new().with_console(false).with_file(file);
    init_logging(&config)?;

    for i in 0..50_000 {
        tracing::info!(seq = i, "Log message number {}", i);
    }

    // Flush the background writer before looking at the directory
    zaplog::shutdown();

    for entry in std::fs::read_dir(temp_dir.path())? {
        let entry = entry?;
        println!("{} ({} bytes)", entry.file_name().to_string_lossy(), entry.metadata()?.len());
    }

    Ok(())
}
