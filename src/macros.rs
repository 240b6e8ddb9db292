//! Logging macros with compile-time checked formatting.
//!
//! The level is checked before the message is formatted, so disabled
//! levels cost neither the `format!` nor an allocation.
//!
//! # Examples
//!
//! ```
//! use async_event_log::backends::JsonBackend;
//! use async_event_log::prelude::*;
//! use async_event_log::{info, signal};
//!
//! let logger = AsyncLogger::new(JsonBackend::new("server", Vec::new())).unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! signal!(logger, LogLevel::Warn, 1001, "Connection pool at {}%", 90);
//!
//! logger.close().unwrap();
//! ```

/// Log a formatted message at the given level.
///
/// ```
/// # use async_event_log::backends::JsonBackend;
/// # use async_event_log::prelude::*;
/// # let logger = AsyncLogger::new(JsonBackend::new("app", Vec::new())).unwrap();
/// use async_event_log::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// # logger.close().unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Emit a signal event, optionally with a formatted message.
///
/// ```
/// # use async_event_log::backends::JsonBackend;
/// # use async_event_log::prelude::*;
/// # let logger = AsyncLogger::new(JsonBackend::new("app", Vec::new())).unwrap();
/// use async_event_log::signal;
/// signal!(logger, LogLevel::Info, 7);
/// signal!(logger, LogLevel::Error, 500, "upstream {} returned {}", "billing", 503);
/// # logger.close().unwrap();
/// ```
#[macro_export]
macro_rules! signal {
    ($logger:expr, $level:expr, $id:expr $(,)?) => {{
        $logger.emit_signal($level, $id, None, None, None)
    }};
    ($logger:expr, $level:expr, $id:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.signal(level, $id, format!($($arg)+));
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{AsyncLogger, Backend, LogEvent, LogLevel, Result};
    use parking_lot::Mutex;

    struct Collect {
        min_level: LogLevel,
        messages: Mutex<Vec<(LogLevel, Option<String>, Option<i64>)>>,
    }

    impl Collect {
        fn new(min_level: LogLevel) -> Self {
            Self {
                min_level,
                messages: Mutex::new(Vec::new()),
            }
        }
    }

    impl Backend for Collect {
        fn is_enabled(&self, level: LogLevel) -> bool {
            level >= self.min_level
        }

        fn log(&self, event: &LogEvent) -> Result<()> {
            self.messages.lock().push((
                event.level(),
                event.message().map(String::from),
                event.event_id(),
            ));
            Ok(())
        }

        fn name(&self) -> &str {
            "collect"
        }
    }

    #[test]
    fn test_level_macros() {
        let logger = AsyncLogger::new(Collect::new(LogLevel::Debug)).unwrap();
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Fatal message");
        logger.close().unwrap();

        let messages = logger.backend().messages.lock();
        let texts: Vec<_> = messages.iter().map(|m| m.1.clone().unwrap()).collect();
        assert_eq!(
            texts,
            ["Count: 5", "Items: 100", "Retry 1 of 3", "Code: 500", "Fatal message"]
        );
        assert_eq!(messages[3].0, LogLevel::Error);
    }

    #[test]
    fn test_signal_macro() {
        let logger = AsyncLogger::new(Collect::new(LogLevel::Info)).unwrap();
        signal!(logger, LogLevel::Warn, 42);
        signal!(logger, LogLevel::Warn, 43, "pool at {}%", 90);
        signal!(logger, LogLevel::Debug, 44, "filtered {}", 1);
        logger.close().unwrap();

        let messages = logger.backend().messages.lock();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], (LogLevel::Warn, None, Some(42)));
        assert_eq!(messages[1], (LogLevel::Warn, Some("pool at 90%".to_string()), Some(43)));
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        struct Loud;
        impl std::fmt::Display for Loud {
            fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("formatted a disabled message");
            }
        }

        let logger = AsyncLogger::new(Collect::new(LogLevel::Error)).unwrap();
        debug!(logger, "{}", Loud);
        logger.close().unwrap();
        assert!(logger.backend().messages.lock().is_empty());
    }
}
