//! Core types, traits and the async logger

pub mod async_logger;
pub mod backend;
pub mod discard_policy;
pub mod error;
pub mod format;
pub mod log_event;
pub mod log_level;
pub mod metrics;
pub mod properties;
pub mod timestamp;
mod trigger;

pub use async_logger::{AsyncLogger, AsyncLoggerBuilder, DEFAULT_DRAIN_DELAY, DEFAULT_THREAD_NAME};
pub use backend::Backend;
pub use discard_policy::{DiscardCallback, DiscardPolicy};
pub use error::{LoggerError, Result};
pub use format::{format_positional, format_positional_with, FormatProvider, Invariant};
pub use log_event::{render_error, LogEvent};
pub use log_level::LogLevel;
pub use metrics::QueueMetrics;
pub use properties::{FieldValue, Properties, EVENT_ID_KEY};
pub use timestamp::TimestampFormat;
