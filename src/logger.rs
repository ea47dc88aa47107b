use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::constants::MAX_LOG_ENTRIES;

/// Shared logger that can be used across the application.
///
/// Entries always land in an in-memory ring of the last [`MAX_LOG_ENTRIES`]
/// lines; when file logging is enabled they are also appended to the log file.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
    level: LevelFilter,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            file_writer: None,
            level: LevelFilter::Info,
        }
    }

    /// Build a logger from the `[logging]` config section
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let mut logger = Self::new();
        logger.level = config.level_filter()?;

        if config.enabled {
            let path = Self::get_log_file_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            logger.file_writer = Some(Arc::new(Mutex::new(BufWriter::new(file))));
        }

        Ok(logger)
    }

    pub fn is_enabled(&self) -> bool {
        self.file_writer.is_some()
    }

    pub fn file_writer(&self) -> Option<Arc<Mutex<BufWriter<File>>>> {
        self.file_writer.clone()
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Some(writer) = &self.file_writer {
            if let Ok(mut writer) = writer.lock() {
                let _ = writeln!(writer, "{}", formatted_message);
                let _ = writer.flush();
            }
        }

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= MAX_LOG_ENTRIES {
                logs.pop_front();
            }
            logs.push_back(formatted_message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Location of the log file when file logging is enabled
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("tasklayer").join("tasklayer.log"))
    }

    /// Route the `log` facade into this logger.
    ///
    /// # Errors
    /// Fails if a global logger has already been installed
    pub fn install(&self) -> Result<()> {
        let sink = self.clone();
        fern::Dispatch::new()
            .level(self.level)
            .level_for("sqlx", LevelFilter::Warn)
            .level_for("sea_orm", LevelFilter::Warn)
            .chain(fern::Output::call(move |record| {
                sink.log(format!("{} [{}] {}", record.level(), record.target(), record.args()));
            }))
            .apply()
            .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
