//! Asynchronous, non-blocking decorator over a synchronous backend

use super::{
    backend::Backend,
    discard_policy::{DiscardCallback, DiscardPolicy},
    error::{LoggerError, Result},
    format::{format_positional_with, FormatProvider, Invariant},
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::QueueMetrics,
    properties::Properties,
    trigger::{DrainTrigger, Wake},
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::any::Any;
use std::error::Error;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default coalescing delay between the first emit and the drain pass
pub const DEFAULT_DRAIN_DELAY: Duration = Duration::from_millis(1);

/// Default name of the background drain thread
pub const DEFAULT_THREAD_NAME: &str = "async-log-drain";

/// State shared between the owning `AsyncLogger` and its drain worker
struct Shared<B> {
    backend: B,
    receiver: Receiver<LogEvent>,
    trigger: DrainTrigger,
    /// Held for every drain pass and while closing
    drain_lock: Mutex<()>,
    closed: AtomicBool,
    metrics: QueueMetrics,
    /// First backend failure seen by the worker, returned from `close()`
    worker_failure: Mutex<Option<LoggerError>>,
}

impl<B: Backend> Shared<B> {
    /// Pop and deliver events until the queue is empty.
    ///
    /// Caller must hold `drain_lock`. Stops at the first backend failure and
    /// leaves the rest queued.
    fn drain_queue(&self) -> Result<usize> {
        let mut delivered = 0;
        while let Ok(event) = self.receiver.try_recv() {
            if let Err(e) = self.backend.log(&event) {
                self.metrics.record_backend_failure();
                return Err(e);
            }
            self.metrics.record_delivered();
            delivered += 1;
        }
        Ok(delivered)
    }

    fn run_worker(&self, drain_delay: Duration) {
        loop {
            if self.trigger.wait(drain_delay) == Wake::Shutdown {
                return;
            }

            let _drain = self.drain_lock.lock();
            if self.closed.load(Ordering::SeqCst) {
                return;
            }
            // Disarm before draining so an emit racing the pass re-arms
            self.trigger.disarm();
            self.metrics.record_drain_pass();

            match panic::catch_unwind(AssertUnwindSafe(|| self.drain_queue())) {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Backend '{}' failed during background drain: {}",
                        self.backend.name(),
                        e
                    );
                    self.record_failure(e);
                }
                Err(payload) => {
                    // The event being delivered is lost; the worker keeps draining
                    self.metrics.record_backend_failure();
                    let message = panic_message(payload.as_ref());
                    eprintln!(
                        "[LOGGER CRITICAL] Backend '{}' panicked during background drain: {}",
                        self.backend.name(),
                        message
                    );
                    self.record_failure(LoggerError::WorkerPanicked(message));
                    if !self.receiver.is_empty() {
                        self.trigger.arm();
                    }
                }
            }
        }
    }

    /// Keep the first failure for `close()` to return
    fn record_failure(&self, error: LoggerError) {
        let mut failure = self.worker_failure.lock();
        if failure.is_none() {
            *failure = Some(error);
        }
    }
}

/// Extract a readable message from a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

macro_rules! level_methods {
    (
        $level:expr,
        $label:literal,
        $enabled:ident,
        $plain:ident,
        $with_error:ident,
        $fmt:ident,
        $fmt_with:ident
    ) => {
        #[doc = concat!("Whether the backend accepts ", $label, " events")]
        #[inline]
        pub fn $enabled(&self) -> bool {
            self.is_enabled($level)
        }

        #[doc = concat!("Queue a ", $label, " message")]
        #[inline]
        pub fn $plain(&self, message: impl Into<String>) {
            self.log($level, message);
        }

        #[doc = concat!("Queue a ", $label, " message with an error's rendering")]
        #[inline]
        pub fn $with_error(&self, message: impl Into<String>, error: &dyn Error) {
            self.log_with_error($level, message, error);
        }

        #[doc = concat!("Queue a positionally formatted ", $label, " message")]
        #[inline]
        pub fn $fmt(&self, format: &str, args: &[&dyn Display]) -> Result<()> {
            self.log_fmt($level, format, args)
        }

        #[doc = concat!("Queue a ", $label, " message formatted by `provider`")]
        #[inline]
        pub fn $fmt_with(
            &self,
            provider: &dyn FormatProvider,
            format: &str,
            args: &[&dyn Display],
        ) -> Result<()> {
            self.log_fmt_with(provider, $level, format, args)
        }
    };
}

/// Non-blocking logger delivering events to a synchronous backend
///
/// Emitting builds an immutable [`LogEvent`], appends it to an unbounded
/// queue and arms the drain trigger; a background thread delivers queued
/// events to the backend in enqueue order. [`close`](Self::close) must be
/// called before the logger is dropped: it stops the worker and drains the
/// remaining events on the caller's thread. Dropping a logger that still
/// holds events raises [`LoggerError::EventsDiscarded`] according to its
/// [`DiscardPolicy`].
///
/// # Example
///
/// ```
/// use async_event_log::backends::JsonBackend;
/// use async_event_log::prelude::*;
///
/// let logger = AsyncLogger::new(JsonBackend::new("app", Vec::new())).unwrap();
/// logger.info("service started");
/// logger.signal(LogLevel::Warn, 42, "disk nearly full");
/// logger.info_fmt("{0} requests in {1} ms", &[&120, &35]).unwrap();
/// logger.close().unwrap();
/// ```
pub struct AsyncLogger<B: Backend + 'static> {
    shared: Arc<Shared<B>>,
    sender: Sender<LogEvent>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    discard_policy: DiscardPolicy,
    on_discard: Option<DiscardCallback>,
}

impl<B: Backend + 'static> AsyncLogger<B> {
    /// Wrap `backend` with the default configuration
    pub fn new(backend: B) -> Result<Self> {
        AsyncLoggerBuilder::new().build(backend)
    }

    /// Create a builder for AsyncLogger
    #[must_use]
    pub fn builder() -> AsyncLoggerBuilder {
        AsyncLoggerBuilder::new()
    }

    /// Run `f` with a logger wrapping `backend`, closing it when `f` returns.
    ///
    /// The logger is closed even if `f` panics; the panic is resumed after
    /// the final drain.
    ///
    /// ```
    /// use async_event_log::backends::JsonBackend;
    /// use async_event_log::AsyncLogger;
    ///
    /// let lines = AsyncLogger::scope(JsonBackend::new("job", Vec::new()), |log| {
    ///     log.info("step 1");
    ///     log.info("step 2");
    ///     2
    /// })
    /// .unwrap();
    /// assert_eq!(lines, 2);
    /// ```
    pub fn scope<R>(backend: B, f: impl FnOnce(&AsyncLogger<B>) -> R) -> Result<R> {
        let logger = Self::new(backend)?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&logger)));
        let closed = logger.close();
        match outcome {
            Ok(value) => closed.map(|()| value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    fn start(backend: B, config: AsyncLoggerBuilder) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let shared = Arc::new(Shared {
            backend,
            receiver,
            trigger: DrainTrigger::new(),
            drain_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
            metrics: QueueMetrics::new(),
            worker_failure: Mutex::new(None),
        });

        let worker_shared = Arc::clone(&shared);
        let drain_delay = config.drain_delay;
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || worker_shared.run_worker(drain_delay))
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning drain worker",
                    format!("thread '{}' could not be started", config.thread_name),
                    e,
                )
            })?;

        Ok(Self {
            shared,
            sender,
            worker: Mutex::new(Some(handle)),
            discard_policy: config.discard_policy,
            on_discard: config.on_discard,
        })
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// Identity of the wrapped backend
    pub fn name(&self) -> &str {
        self.shared.backend.name()
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.shared.metrics
    }

    /// Number of events currently queued
    pub fn pending(&self) -> usize {
        self.shared.receiver.len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Whether the backend accepts events at `level`
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shared.backend.is_enabled(level)
    }

    level_methods!(
        LogLevel::Debug,
        "debug",
        is_debug_enabled,
        debug,
        debug_with_error,
        debug_fmt,
        debug_fmt_with
    );
    level_methods!(
        LogLevel::Info,
        "info",
        is_info_enabled,
        info,
        info_with_error,
        info_fmt,
        info_fmt_with
    );
    level_methods!(
        LogLevel::Warn,
        "warn",
        is_warn_enabled,
        warn,
        warn_with_error,
        warn_fmt,
        warn_fmt_with
    );
    level_methods!(
        LogLevel::Error,
        "error",
        is_error_enabled,
        error,
        error_with_error,
        error_fmt,
        error_fmt_with
    );
    level_methods!(
        LogLevel::Fatal,
        "fatal",
        is_fatal_enabled,
        fatal,
        fatal_with_error,
        fatal_fmt,
        fatal_fmt_with
    );

    /// Queue an event with every optional part.
    ///
    /// Does nothing when the backend has `level` disabled. `EventID` is
    /// stamped only for a positive `event_id`; use
    /// [`emit_signal`](Self::emit_signal) to always stamp it.
    pub fn emit(
        &self,
        level: LogLevel,
        message: Option<String>,
        event_id: Option<i32>,
        properties: Option<Properties>,
        error: Option<&dyn Error>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        let event_id = event_id.filter(|id| *id > 0);
        self.enqueue(self.build_event(level, message, event_id, properties, error));
    }

    /// Queue a signal event: `EventID` is always stamped with `event_id`
    pub fn emit_signal(
        &self,
        level: LogLevel,
        event_id: i32,
        message: Option<String>,
        properties: Option<Properties>,
        error: Option<&dyn Error>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.enqueue(self.build_event(level, message, Some(event_id), properties, error));
    }

    /// Queue a signal event with a message
    #[inline]
    pub fn signal(&self, level: LogLevel, event_id: i32, message: impl Into<String>) {
        self.emit_signal(level, event_id, Some(message.into()), None, None);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.enqueue(self.build_event(level, Some(message.into()), None, None, None));
    }

    pub fn log_with_error(&self, level: LogLevel, message: impl Into<String>, error: &dyn Error) {
        if !self.is_enabled(level) {
            return;
        }
        self.enqueue(self.build_event(level, Some(message.into()), None, None, Some(error)));
    }

    /// Format `format` with positional `args` and queue the result.
    ///
    /// Formatting happens on the caller's thread, only when `level` is
    /// enabled; a malformed format string returns `LoggerError::FormatError`
    /// and queues nothing.
    pub fn log_fmt(&self, level: LogLevel, format: &str, args: &[&dyn Display]) -> Result<()> {
        self.log_fmt_with(&Invariant, level, format, args)
    }

    pub fn log_fmt_with(
        &self,
        provider: &dyn FormatProvider,
        level: LogLevel,
        format: &str,
        args: &[&dyn Display],
    ) -> Result<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let message = format_positional_with(provider, format, args)?;
        self.enqueue(self.build_event(level, Some(message), None, None, None));
        Ok(())
    }

    fn build_event(
        &self,
        level: LogLevel,
        message: Option<String>,
        event_id: Option<i32>,
        properties: Option<Properties>,
        error: Option<&dyn Error>,
    ) -> LogEvent {
        let mut event = LogEvent::new(self.name(), level, message);
        if let Some(properties) = properties {
            event = event.with_properties(properties);
        }
        if let Some(id) = event_id {
            event = event.with_event_id(id);
        }
        if let Some(error) = error {
            event = event.with_error(error);
        }
        event
    }

    fn enqueue(&self, event: LogEvent) {
        if self.is_closed() {
            let rejected = self.shared.metrics.record_rejected();
            if rejected == 0 || (rejected + 1) % 1000 == 0 {
                eprintln!(
                    "[LOGGER WARNING] Event emitted after close() on '{}' was rejected \
                     ({} rejected so far)",
                    self.name(),
                    rejected + 1
                );
            }
            return;
        }

        // The receiver lives in `shared` as long as `self`, so this cannot fail
        let sent = self.sender.send(event).is_ok();
        debug_assert!(sent, "event queue receiver dropped while logger alive");
        self.shared.metrics.record_enqueued();

        if self.is_closed() {
            // Raced with close(): the worker is gone, deliver it here
            self.drain_on_caller();
            return;
        }
        self.shared.trigger.arm();
    }

    fn drain_on_caller(&self) {
        let _drain = self.shared.drain_lock.lock();
        if let Err(e) = self.shared.drain_queue() {
            eprintln!(
                "[LOGGER ERROR] Backend '{}' failed draining an event that raced close(): {}",
                self.name(),
                e
            );
            self.shared.record_failure(e);
        }
    }

    fn join_worker(&self) -> Result<()> {
        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => handle.join().map_err(|payload| {
                let message = panic_message(payload.as_ref());
                eprintln!("[LOGGER ERROR] Drain worker panicked: {}", message);
                LoggerError::WorkerPanicked(message)
            }),
            None => Ok(()),
        }
    }

    /// Stop the drain worker and deliver every queued event before returning.
    ///
    /// Closing is terminal; later emits are rejected. Calling `close()` again
    /// is a no-op drain of the (empty) queue.
    ///
    /// # Errors
    ///
    /// - the backend's error if it fails during the final drain; the events
    ///   after the failing one stay queued and a later `close()` retries them
    /// - the first failure seen off the caller's thread: a backend error or
    ///   panic (`WorkerPanicked`) on the drain thread, or a backend error
    ///   while a producer drained an event that raced `close()`
    pub fn close(&self) -> Result<()> {
        {
            let _drain = self.shared.drain_lock.lock();
            self.shared.closed.store(true, Ordering::SeqCst);
            self.shared.trigger.shutdown();
        }

        let worker_result = self.join_worker();

        {
            let _drain = self.shared.drain_lock.lock();
            self.shared.drain_queue()?;
        }

        worker_result?;
        match self.shared.worker_failure.lock().take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

impl<B: Backend + 'static> Drop for AsyncLogger<B> {
    fn drop(&mut self) {
        if !self.is_closed() {
            // Stop the worker without draining: what is left is lost
            self.shared.trigger.shutdown();
            let _ = self.join_worker();
        }

        if let Some(failure) = self.shared.worker_failure.lock().take() {
            eprintln!(
                "[LOGGER ERROR] Unreported backend failure on '{}': {}",
                self.name(),
                failure
            );
        }

        let count = self.shared.receiver.len();
        if count == 0 {
            return;
        }

        if let Some(ref callback) = self.on_discard {
            callback(count);
        }

        let err = LoggerError::events_discarded(count);
        match self.discard_policy {
            DiscardPolicy::Panic if !thread::panicking() => panic!("{}", err),
            _ => eprintln!("[LOGGER CRITICAL] {} (logger '{}')", err, self.name()),
        }
    }
}

/// Builder for constructing AsyncLogger with a fluent API
///
/// # Example
/// ```
/// use async_event_log::backends::JsonBackend;
/// use async_event_log::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let logger = AsyncLogger::<JsonBackend<Vec<u8>>>::builder()
///     .drain_delay(Duration::from_millis(5))
///     .thread_name("audit-drain")
///     .discard_policy(DiscardPolicy::Report)
///     .on_discard(Arc::new(|count| {
///         eprintln!("ALERT: {} events lost", count);
///     }))
///     .build(JsonBackend::new("audit", Vec::new()))
///     .unwrap();
/// logger.close().unwrap();
/// ```
pub struct AsyncLoggerBuilder {
    drain_delay: Duration,
    discard_policy: DiscardPolicy,
    on_discard: Option<DiscardCallback>,
    thread_name: String,
}

impl AsyncLoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            drain_delay: DEFAULT_DRAIN_DELAY,
            discard_policy: DiscardPolicy::Panic,
            on_discard: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Set the coalescing delay between the first emit and the drain pass
    ///
    /// Events emitted within this window are delivered in one pass.
    /// `Duration::ZERO` drains as soon as the worker wakes.
    #[must_use = "builder methods return a new value"]
    pub fn drain_delay(mut self, delay: Duration) -> Self {
        self.drain_delay = delay;
        self
    }

    /// Set how a drop with queued events is reported. Default is `Panic`.
    #[must_use = "builder methods return a new value"]
    pub fn discard_policy(mut self, policy: DiscardPolicy) -> Self {
        self.discard_policy = policy;
        self
    }

    /// Set a callback invoked with the discarded count before the policy applies
    #[must_use = "builder methods return a new value"]
    pub fn on_discard(mut self, callback: DiscardCallback) -> Self {
        self.on_discard = Some(callback);
        self
    }

    /// Name the background drain thread
    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Build the AsyncLogger around `backend` and start its drain worker
    pub fn build<B: Backend + 'static>(self, backend: B) -> Result<AsyncLogger<B>> {
        if self.thread_name.trim().is_empty() {
            return Err(LoggerError::config(
                "AsyncLoggerBuilder",
                "drain thread name must not be empty",
            ));
        }
        AsyncLogger::start(backend, self)
    }
}

impl Default for AsyncLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
