//! Queue metrics for observability
//!
//! Counters describing the flow of events through an `AsyncLogger`:
//! how many were queued, delivered, rejected, and how many drain passes
//! the worker ran to deliver them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the async event queue
///
/// # Example
///
/// ```
/// use async_event_log::QueueMetrics;
///
/// let metrics = QueueMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_enqueued();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.pending(), 1);
/// ```
#[derive(Debug)]
pub struct QueueMetrics {
    /// Events accepted into the queue
    enqueued: AtomicU64,

    /// Events handed to the backend successfully
    delivered: AtomicU64,

    /// Drain passes run by the background worker
    drain_passes: AtomicU64,

    /// Events the backend failed to write
    backend_failures: AtomicU64,

    /// Events emitted after close and not queued
    rejected: AtomicU64,
}

impl QueueMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            drain_passes: AtomicU64::new(0),
            backend_failures: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Number of background drain passes, including passes that found the queue empty
    #[inline]
    pub fn drain_passes(&self) -> u64 {
        self.drain_passes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn backend_failures(&self) -> u64 {
        self.backend_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Events queued but not yet handed to the backend
    pub fn pending(&self) -> u64 {
        self.enqueued()
            .saturating_sub(self.delivered())
            .saturating_sub(self.backend_failures())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_drain_pass(&self) -> u64 {
        self.drain_passes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_backend_failure(&self) -> u64 {
        self.backend_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for QueueMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            delivered: AtomicU64::new(self.delivered()),
            drain_passes: AtomicU64::new(self.drain_passes()),
            backend_failures: AtomicU64::new(self.backend_failures()),
            rejected: AtomicU64::new(self.rejected()),
        }
    }
}
