use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Unknown levels fall back to info.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn make_writer(path: &str) -> Result<BoxMakeWriter> {
    Ok(match path {
        "" | "stdout" => BoxMakeWriter::new(std::io::stdout),
        "stderr" => BoxMakeWriter::new(std::io::stderr),
        file => {
            let file_path = Path::new(file);
            if let Some(parent) = file_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    })
}

/// Installs the global JSON log subscriber.
pub fn init_logging(level: &str, path: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_max_level(parse_level(level))
        .with_writer(make_writer(path)?)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}
