//! Backend trait for the synchronous logger wrapped by `AsyncLogger`

use super::{error::Result, log_event::LogEvent, log_level::LogLevel};
use std::sync::Arc;

/// A synchronous logging sink
///
/// `is_enabled` is called from producer threads, `log` only from the drain
/// context, so implementations must be `Send + Sync` and use interior
/// mutability for any write state.
pub trait Backend: Send + Sync {
    /// Whether events at `level` would be written
    fn is_enabled(&self, level: LogLevel) -> bool;

    /// Write one event
    fn log(&self, event: &LogEvent) -> Result<()>;

    /// Logger identity, stamped into every event
    fn name(&self) -> &str;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn is_enabled(&self, level: LogLevel) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, event: &LogEvent) -> Result<()> {
        (**self).log(event)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn is_enabled(&self, level: LogLevel) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, event: &LogEvent) -> Result<()> {
        (**self).log(event)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
