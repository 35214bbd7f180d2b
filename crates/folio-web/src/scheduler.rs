#![forbid(unsafe_code)]

//! Virtual-time scheduler.
//!
//! Timeouts fire in `(due, id)` order when the host advances time; frame
//! requests fire together on the next [`ManualScheduler::take_frames`]. A frame
//! requested from inside a frame callback lands in the following frame, like
//! `requestAnimationFrame`.

use core::time::Duration;
use std::collections::{BTreeMap, HashMap};

use folio_core::schedule::{Scheduler, TaskHandle, TaskKind};

use crate::DeterministicClock;

/// Deterministic [`Scheduler`] driven by explicit time steps.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    clock: DeterministicClock,
    next_id: u64,
    timeouts: BTreeMap<(Duration, u64), TaskHandle>,
    due: HashMap<TaskHandle, Duration>,
    frames: Vec<TaskHandle>,
    fired: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Number of timeouts still waiting.
    #[must_use]
    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    /// Number of frame requests waiting for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Total handles handed out by `pop_due` and `take_frames`.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// What a still-pending handle is waiting for.
    #[must_use]
    pub fn kind_of(&self, handle: TaskHandle) -> Option<TaskKind> {
        if self.due.contains_key(&handle) {
            Some(TaskKind::Timeout)
        } else if self.frames.contains(&handle) {
            Some(TaskKind::Frame)
        } else {
            None
        }
    }

    /// Due time of the earliest pending timeout.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timeouts.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timeout due at or before `deadline`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TaskHandle> {
        let (&(due, id), _) = self.timeouts.iter().next()?;
        if due > deadline {
            return None;
        }
        let handle = self.timeouts.remove(&(due, id))?;
        self.due.remove(&handle);
        self.settle(due);
        self.fired += 1;
        Some(handle)
    }

    /// Move the clock forward to `now` without firing anything. Earlier
    /// times are ignored.
    pub fn settle(&mut self, now: Duration) {
        if now > self.clock.now() {
            self.clock.set(now);
        }
    }

    /// Fire every timeout due within `dt`, in order, then settle the clock at
    /// `now + dt`. Timeouts scheduled by `on_fire` that fall inside the window
    /// fire in the same call.
    pub fn advance<F>(&mut self, dt: Duration, mut on_fire: F) -> usize
    where
        F: FnMut(&mut Self, TaskHandle),
    {
        let deadline = self.clock.now().saturating_add(dt);
        let mut count = 0;
        while let Some(handle) = self.pop_due(deadline) {
            on_fire(self, handle);
            count += 1;
        }
        self.settle(deadline);
        count
    }

    /// Take the frame requests made so far. Requests made while handling
    /// these go to the next frame.
    pub fn take_frames(&mut self) -> Vec<TaskHandle> {
        let frames = std::mem::take(&mut self.frames);
        self.fired += frames.len() as u64;
        frames
    }

    /// Run one frame: fire every outstanding frame request once.
    pub fn tick_frame<F>(&mut self, mut on_fire: F) -> usize
    where
        F: FnMut(&mut Self, TaskHandle),
    {
        let frames = self.take_frames();
        for &handle in &frames {
            on_fire(self, handle);
        }
        frames.len()
    }

    fn next_handle(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle::from_raw(self.next_id)
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, delay: Duration) -> TaskHandle {
        let handle = self.next_handle();
        let due = self.clock.now().saturating_add(delay);
        self.timeouts.insert((due, handle.raw()), handle);
        self.due.insert(handle, due);
        handle
    }

    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.next_handle();
        self.frames.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        if let Some(due) = self.due.remove(&handle) {
            self.timeouts.remove(&(due, handle.raw()));
            return true;
        }
        if let Some(pos) = self.frames.iter().position(|&h| h == handle) {
            self.frames.remove(pos);
            return true;
        }
        false
    }

    fn pending_count(&self) -> usize {
        self.timeouts.len() + self.frames.len()
    }
}
