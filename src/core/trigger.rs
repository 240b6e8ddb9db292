//! One-shot coalescing wake-up for the drain worker
//!
//! Producers arm the trigger after each enqueue. Only the call that flips it
//! from disarmed to armed touches the mutex and wakes the worker; every other
//! arm is a single atomic swap. The worker sleeps out the coalescing delay,
//! disarms, and drains, so a burst of emits costs one wake-up and one pass.
//! The trigger never re-arms itself.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why the worker woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The trigger was armed and the coalescing delay has passed
    Fire,
    /// The trigger was shut down; the worker must exit without draining
    Shutdown,
}

#[derive(Debug, Default)]
struct TriggerState {
    shutdown: bool,
}

#[derive(Debug, Default)]
pub(crate) struct DrainTrigger {
    armed: AtomicBool,
    state: Mutex<TriggerState>,
    wakeup: Condvar,
}

impl DrainTrigger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Arm the trigger. Returns `true` if this call armed it.
    pub(crate) fn arm(&self) -> bool {
        if self.armed.swap(true, Ordering::SeqCst) {
            return false;
        }
        // Taking the lock orders this notify after the worker's armed check
        let _state = self.state.lock();
        self.wakeup.notify_one();
        true
    }

    /// Clear the armed flag; called by the worker right before a drain pass
    pub(crate) fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Permanently stop the worker loop
    pub(crate) fn shutdown(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        self.wakeup.notify_all();
    }

    /// Park until armed, then wait out `delay`. Shutdown interrupts both waits.
    pub(crate) fn wait(&self, delay: Duration) -> Wake {
        let mut state = self.state.lock();
        while !state.shutdown && !self.is_armed() {
            self.wakeup.wait(&mut state);
        }
        if state.shutdown {
            return Wake::Shutdown;
        }

        if !delay.is_zero() {
            let deadline = Instant::now() + delay;
            while !state.shutdown {
                if self.wakeup.wait_until(&mut state, deadline).timed_out() {
                    break;
                }
            }
            if state.shutdown {
                return Wake::Shutdown;
            }
        }

        Wake::Fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_only_first_arm_wakes() {
        let trigger = DrainTrigger::new();
        assert!(trigger.arm());
        assert!(!trigger.arm());
        trigger.disarm();
        assert!(trigger.arm());
    }

    #[test]
    fn test_wait_fires_after_arm() {
        let trigger = Arc::new(DrainTrigger::new());
        let waiter = {
            let trigger = Arc::clone(&trigger);
            thread::spawn(move || trigger.wait(Duration::from_millis(1)))
        };
        thread::sleep(Duration::from_millis(20));
        trigger.arm();
        assert_eq!(waiter.join().unwrap(), Wake::Fire);
    }

    #[test]
    fn test_shutdown_interrupts_delay() {
        let trigger = Arc::new(DrainTrigger::new());
        trigger.arm();
        let waiter = {
            let trigger = Arc::clone(&trigger);
            thread::spawn(move || trigger.wait(Duration::from_secs(60)))
        };
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        trigger.shutdown();
        assert_eq!(waiter.join().unwrap(), Wake::Shutdown);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_shutdown_wins_over_armed() {
        let trigger = DrainTrigger::new();
        trigger.arm();
        trigger.shutdown();
        assert_eq!(trigger.wait(Duration::ZERO), Wake::Shutdown);
    }
}
