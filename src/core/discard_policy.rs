//! Policies for events left queued when an `AsyncLogger` is dropped
//!
//! Dropping a logger without `close()` while events are still queued loses
//! those events. That is a bug in the owner, and these policies decide how
//! loudly it is reported. Neither policy drops events silently.

use std::fmt;
use std::sync::Arc;

/// What to do when an unclosed logger is dropped with queued events
///
/// # Example
///
/// ```
/// use async_event_log::DiscardPolicy;
///
/// // Default behavior: panic with the discarded count
/// let policy = DiscardPolicy::default();
/// assert_eq!(policy, DiscardPolicy::Panic);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscardPolicy {
    /// Panic with `LoggerError::EventsDiscarded`
    ///
    /// When the dropping thread is already unwinding, the loss is reported
    /// on stderr instead so the process does not abort.
    #[default]
    Panic,

    /// Report on stderr and through the discard callback, then continue
    ///
    /// For hosts where a panic in `Drop` is not acceptable.
    Report,
}

impl fmt::Display for DiscardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardPolicy::Panic => write!(f, "Panic"),
            DiscardPolicy::Report => write!(f, "Report"),
        }
    }
}

/// Callback for discard notifications
///
/// Called with the number of discarded events before the policy is applied.
pub type DiscardCallback = Arc<dyn Fn(usize) + Send + Sync>;
