//! JSON lines backend for structured logging

use crate::core::{Backend, LogEvent, LogLevel, Properties, Result, TimestampFormat};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes each event as a single-line JSON object (JSONL format)
///
/// Compatible with log aggregation tools like ELK, Loki, etc.
pub struct JsonBackend<W: Write + Send> {
    name: String,
    min_level: LogLevel,
    timestamp_format: TimestampFormat,
    writer: Mutex<W>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: LogLevel,
    logger: &'a str,
    thread: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<&'a str>,
}

impl JsonBackend<BufWriter<File>> {
    /// Append JSON lines to the file at `path`, creating it if needed
    pub fn to_file<P: AsRef<Path>>(name: impl Into<String>, path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(name, BufWriter::new(file)))
    }
}

impl<W: Write + Send> JsonBackend<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Debug,
            timestamp_format: TimestampFormat::default(),
            writer: Mutex::new(writer),
        }
    }

    /// Only write events at `level` or above (default `Debug`)
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Lock and access the underlying writer
    pub fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn to_record<'a>(&self, event: &'a LogEvent) -> JsonRecord<'a> {
        JsonRecord {
            timestamp: self.timestamp_format.format(&event.timestamp()),
            level: event.level(),
            logger: event.logger_name(),
            thread: event.thread(),
            message: event.message(),
            properties: event.properties(),
            exception: event.exception_text(),
        }
    }
}

impl<W: Write + Send> Backend for JsonBackend<W> {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, event: &LogEvent) -> Result<()> {
        let json = serde_json::to_string(&self.to_record(event))?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", json)?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<W: Write + Send> Drop for JsonBackend<W> {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed
        let _ = self.writer.get_mut().flush();
    }
}
