//! Console backend implementation

use crate::core::{Backend, LogEvent, LogLevel, Result, TimestampFormat};
use colored::Colorize;

pub struct ConsoleBackend {
    name: String,
    min_level: LogLevel,
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Info,
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Only write events at `level` or above (default `Info`)
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the timestamp format for this backend
    ///
    /// # Examples
    ///
    /// ```
    /// use async_event_log::backends::ConsoleBackend;
    /// use async_event_log::TimestampFormat;
    ///
    /// let backend = ConsoleBackend::new("app")
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, event: &LogEvent) -> String {
        let level = event.level();
        let level_str = if self.use_colors {
            format!("{:5}", level.to_str())
                .color(level.color_code())
                .to_string()
        } else {
            format!("{:5}", level.to_str())
        };

        let mut line = format!(
            "[{}] [{}] {} ({}) - {}",
            self.timestamp_format.format(&event.timestamp()),
            level_str,
            event.logger_name(),
            event.thread(),
            event.message().unwrap_or("")
        );

        if let Some(properties) = event.properties() {
            if !properties.is_empty() {
                line.push(' ');
                line.push_str(&properties.format_fields());
            }
        }
        if let Some(exception) = event.exception_text() {
            line.push_str("\n  ");
            line.push_str(exception);
        }

        line
    }
}

impl Backend for ConsoleBackend {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, event: &LogEvent) -> Result<()> {
        let output = self.format_text(event);

        // Route Error and Fatal levels to stderr, others to stdout
        match event.level() {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Properties;

    #[test]
    fn test_level_gate() {
        let backend = ConsoleBackend::new("app").with_min_level(LogLevel::Warn);
        assert!(!backend.is_enabled(LogLevel::Info));
        assert!(backend.is_enabled(LogLevel::Warn));
        assert!(backend.is_enabled(LogLevel::Fatal));
    }

    #[test]
    fn test_plain_text_layout() {
        let backend = ConsoleBackend::new("app")
            .with_colors(false)
            .with_timestamp_format(TimestampFormat::Custom("T".to_string()));
        let event = LogEvent::new("app", LogLevel::Warn, Some("disk low".into()))
            .with_properties(Properties::new().with("free_mb", 12))
            .with_event_id(42)
            .with_exception_text("io error");

        let text = backend.format_text(&event);
        let expected_head = format!(
            "[T] [WARN ] app ({}) - disk low EventID=42 free_mb=12",
            event.thread()
        );
        assert_eq!(text, format!("{}\n  io error", expected_head));
    }
}
