//! Error types for the async logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed format string or arguments for a formatted message
    #[error("Format error at position {position}: {message}")]
    FormatError { position: usize, message: String },

    /// The wrapped backend failed to write an event
    #[error("Backend '{backend}' failed: {message}")]
    BackendError { backend: String, message: String },

    /// The logger was discarded while events were still queued
    #[error("close() not called on AsyncLogger: {count} events discarded")]
    EventsDiscarded { count: usize },

    /// The background drain worker panicked
    #[error("Drain worker panicked: {0}")]
    WorkerPanicked(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a format error pointing at a byte offset in the format string
    pub fn format(position: usize, message: impl Into<String>) -> Self {
        LoggerError::FormatError {
            position,
            message: message.into(),
        }
    }

    /// Create a backend failure error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::BackendError {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create an events discarded error
    pub fn events_discarded(count: usize) -> Self {
        LoggerError::EventsDiscarded { count }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::events_discarded(3);
        assert!(matches!(err, LoggerError::EventsDiscarded { count: 3 }));

        let err = LoggerError::config("AsyncLoggerBuilder", "empty thread name");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::backend("console", "stdout closed");
        assert!(matches!(err, LoggerError::BackendError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::events_discarded(3);
        assert_eq!(
            err.to_string(),
            "close() not called on AsyncLogger: 3 events discarded"
        );

        let err = LoggerError::format(7, "argument index 2 is out of range");
        assert_eq!(
            err.to_string(),
            "Format error at position 7: argument index 2 is out of range"
        );

        let err = LoggerError::backend("json", "disk full");
        assert_eq!(err.to_string(), "Backend 'json' failed: disk full");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = LoggerError::io_operation("spawning drain worker", "thread spawn failed", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("spawning drain worker"));
    }
}
