//! Immutable log event record

use super::log_level::LogLevel;
use super::properties::{FieldValue, Properties, EVENT_ID_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::Write as _;

// Thread-local cache for the producing thread's label to avoid repeated allocations
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Thread name if set, otherwise its debug id; cached per thread
fn current_thread_label() -> String {
    THREAD_LABEL_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                thread
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("{:?}", thread.id()))
            })
            .clone()
    })
}

/// Render an error and its `source()` chain as text
pub fn render_error(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\n  caused by: {}", cause);
        source = cause.source();
    }
    text
}

/// One logging call, captured at enqueue time
///
/// Fields are private: an event is fully built before it is queued and
/// is only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    logger_name: String,
    level: LogLevel,
    timestamp: DateTime<Utc>,
    thread: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception_text: Option<String>,
}

impl LogEvent {
    /// Start a new event stamped with the current time and thread
    pub fn new(logger_name: impl Into<String>, level: LogLevel, message: Option<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            timestamp: Utc::now(),
            thread: current_thread_label(),
            message,
            properties: None,
            exception_text: None,
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Stamp the reserved `EventID` property, replacing any existing value
    pub fn with_event_id(mut self, event_id: i32) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(EVENT_ID_KEY, FieldValue::Int(event_id as i64));
        self
    }

    /// Capture the textual rendering of an error; the error itself is not kept
    pub fn with_error(mut self, error: &dyn Error) -> Self {
        self.exception_text = Some(render_error(error));
        self
    }

    pub fn with_exception_text(mut self, text: impl Into<String>) -> Self {
        self.exception_text = Some(text.into());
        self
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Name (or id) of the thread that emitted the event
    pub fn thread(&self) -> &str {
        &self.thread
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    pub fn event_id(&self) -> Option<i64> {
        self.properties.as_ref().and_then(Properties::event_id)
    }

    pub fn exception_text(&self) -> Option<&str> {
        self.exception_text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }
    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }
    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }
    impl Error for Inner {}

    #[test]
    fn test_render_error_includes_source_chain() {
        let text = render_error(&Outer(Inner));
        assert_eq!(text, "request failed\n  caused by: connection reset");
    }

    #[test]
    fn test_event_id_overrides_existing_property() {
        let props = Properties::new().with(EVENT_ID_KEY, 1).with("k", "v");
        let event = LogEvent::new("app", LogLevel::Warn, None)
            .with_properties(props)
            .with_event_id(42);

        assert_eq!(event.event_id(), Some(42));
        assert_eq!(event.properties().unwrap().len(), 2);
    }

    #[test]
    fn test_event_captures_thread_label() {
        let handle = std::thread::Builder::new()
            .name("producer-7".into())
            .spawn(|| LogEvent::new("app", LogLevel::Info, Some("hi".into())))
            .unwrap();
        let event = handle.join().unwrap();
        assert_eq!(event.thread(), "producer-7");
        assert_eq!(event.message(), Some("hi"));
        assert!(event.exception_text().is_none());
    }
}
