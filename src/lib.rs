//! # Async Event Log
//!
//! A non-blocking, asynchronous decorator over a synchronous structured
//! logger. Callers enqueue events and return immediately; a background
//! drain worker delivers them to the wrapped [`Backend`].
//!
//! ## Guarantees
//!
//! - **Non-blocking**: emitting appends to a lock-free unbounded queue
//! - **Ordered**: events from one thread reach the backend in emit order
//! - **Coalesced**: bursts of events are delivered in a single drain pass
//! - **Lossless**: [`AsyncLogger::close`] delivers everything still queued,
//!   and dropping a logger with queued events fails loudly

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        AsyncLogger, AsyncLoggerBuilder, Backend, DiscardCallback, DiscardPolicy, FieldValue,
        FormatProvider, Invariant, LogEvent, LogLevel, LoggerError, Properties, QueueMetrics,
        Result, TimestampFormat, DEFAULT_DRAIN_DELAY, EVENT_ID_KEY,
    };
}

pub use core::{
    AsyncLogger, AsyncLoggerBuilder, Backend, DiscardCallback, DiscardPolicy, FieldValue,
    FormatProvider, Invariant, LogEvent, LogLevel, LoggerError, Properties, QueueMetrics, Result,
    TimestampFormat, DEFAULT_DRAIN_DELAY, EVENT_ID_KEY,
};
