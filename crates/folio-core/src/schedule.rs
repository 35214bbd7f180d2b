#![forbid(unsafe_code)]

//! Scheduling capability: timers and display-refresh callbacks.
//!
//! Engines never hand closures to a scheduler. They request work, keep the
//! returned [`TaskHandle`], and when the host reports that a handle fired they
//! compare it with the one they are waiting on. A firing for any other handle
//! (cancelled, superseded, or belonging to another engine) is ignored, which
//! makes late callbacks harmless no-ops after teardown.
//!
//! # Invariants
//!
//! 1. [`PendingTask`] holds at most one handle; arming it cancels the previous
//!    one first, so an engine never has two timers outstanding.
//! 2. [`Scheduler::cancel`] is idempotent: cancelling a fired, cancelled, or
//!    unknown handle returns `false` and has no effect.

use std::time::Duration;

/// Opaque identifier of a scheduled timer or frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wrap a raw scheduler-assigned id.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id, for bridging to host callbacks.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What kind of resumption a handle represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Fires once after a delay (`setTimeout`).
    Timeout,
    /// Fires once on the next display refresh (`requestAnimationFrame`).
    Frame,
}

/// Host scheduling primitive.
///
/// Production adapters wrap the browser's timer and frame APIs; tests use a
/// manual clock that fires handles deterministically.
pub trait Scheduler {
    /// Request a one-shot timer firing after `delay`.
    fn set_timeout(&mut self, delay: Duration) -> TaskHandle;

    /// Request a one-shot callback on the next display refresh.
    fn request_frame(&mut self) -> TaskHandle;

    /// Cancel a pending request. Returns `true` if something was pending.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Number of requests still pending.
    fn pending_count(&self) -> usize;
}

/// Single pending-task slot owned by one engine instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingTask {
    handle: Option<TaskHandle>,
}

impl PendingTask {
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// The outstanding handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// Cancel any outstanding request, then schedule a timeout.
    pub fn set_timeout(&mut self, scheduler: &mut dyn Scheduler, delay: Duration) -> TaskHandle {
        self.cancel(scheduler);
        let handle = scheduler.set_timeout(delay);
        self.handle = Some(handle);
        handle
    }

    /// Cancel any outstanding request, then request a frame.
    pub fn request_frame(&mut self, scheduler: &mut dyn Scheduler) -> TaskHandle {
        self.cancel(scheduler);
        let handle = scheduler.request_frame();
        self.handle = Some(handle);
        handle
    }

    /// Consume a firing. Returns `true` only if `handle` is the one this slot
    /// was waiting for; the slot is then empty.
    pub fn fire(&mut self, handle: TaskHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    /// Cancel the outstanding request, if any. Idempotent.
    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.handle.take() {
            Some(handle) => scheduler.cancel(handle),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct CountingScheduler {
        next: u64,
        pending: BTreeSet<TaskHandle>,
    }

    impl Scheduler for CountingScheduler {
        fn set_timeout(&mut self, _delay: Duration) -> TaskHandle {
            self.next += 1;
            let handle = TaskHandle::from_raw(self.next);
            self.pending.insert(handle);
            handle
        }

        fn request_frame(&mut self) -> TaskHandle {
            self.set_timeout(Duration::ZERO)
        }

        fn cancel(&mut self, handle: TaskHandle) -> bool {
            self.pending.remove(&handle)
        }

        fn pending_count(&self) -> usize {
            self.pending.len()
        }
    }

    #[test]
    fn arming_replaces_previous_request() {
        let mut sched = CountingScheduler::default();
        let mut slot = PendingTask::new();
        let first = slot.set_timeout(&mut sched, Duration::from_millis(10));
        let second = slot.set_timeout(&mut sched, Duration::from_millis(10));
        assert_ne!(first, second);
        assert_eq!(sched.pending_count(), 1);
        assert!(!slot.fire(first));
        assert!(slot.fire(second));
        assert!(!slot.is_pending());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sched = CountingScheduler::default();
        let mut slot = PendingTask::new();
        slot.request_frame(&mut sched);
        assert!(slot.cancel(&mut sched));
        assert!(!slot.cancel(&mut sched));
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn fire_with_foreign_handle_is_ignored() {
        let mut sched = CountingScheduler::default();
        let mut slot = PendingTask::new();
        let mine = slot.set_timeout(&mut sched, Duration::from_millis(1));
        assert!(!slot.fire(TaskHandle::from_raw(mine.raw() + 100)));
        assert_eq!(slot.handle(), Some(mine));
    }
}
