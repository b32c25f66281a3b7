use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};
use tracing_subscriber::EnvFilter;

pub const DATA_FILE: &str = "todo.csv";
pub const LOG_FILE: &str = "todo.log";
pub const TITLE: &str = "To-Do List Manager";

/// Fixed locations, relative to the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub title: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            log_file: PathBuf::from(LOG_FILE),
            title: TITLE,
        }
    }
}

impl Config {
    /// Sends tracing output to the log file; the terminal belongs to the UI.
    /// `RUST_LOG` overrides the default `info` level.
    pub fn init_logging(&self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
        Ok(())
    }
}
