#![forbid(unsafe_code)]

//! Bookkeeping between engine [`TaskHandle`]s and browser timer ids.
//!
//! Browser timers are identified by `i32` ids from `setTimeout`; frame
//! requests share one `requestAnimationFrame` registration per scheduler, so
//! only their handles are queued here.

use std::collections::BTreeMap;

use folio_core::schedule::{TaskHandle, TaskKind};

/// Outstanding timers and frame requests of one browser scheduler.
#[derive(Debug, Default, Clone)]
pub struct TaskRegistry {
    next: u64,
    timeouts: BTreeMap<TaskHandle, i32>,
    frames: Vec<TaskHandle>,
}

impl TaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh handle.
    pub fn allocate(&mut self) -> TaskHandle {
        self.next += 1;
        TaskHandle::from_raw(self.next)
    }

    /// Record the browser id behind a timeout handle.
    pub fn insert_timeout(&mut self, handle: TaskHandle, browser_id: i32) {
        self.timeouts.insert(handle, browser_id);
    }

    /// A timeout fired. Returns `false` if it was cancelled meanwhile.
    pub fn complete_timeout(&mut self, handle: TaskHandle) -> bool {
        self.timeouts.remove(&handle).is_some()
    }

    /// Forget a timeout, returning its browser id for `clearTimeout`.
    pub fn remove_timeout(&mut self, handle: TaskHandle) -> Option<i32> {
        self.timeouts.remove(&handle)
    }

    /// Queue a frame request. Returns `true` if it is the first one, i.e. the
    /// caller must register an animation frame.
    pub fn push_frame(&mut self, handle: TaskHandle) -> bool {
        self.frames.push(handle);
        self.frames.len() == 1
    }

    /// Drop a queued frame request.
    pub fn remove_frame(&mut self, handle: TaskHandle) -> bool {
        match self.frames.iter().position(|&h| h == handle) {
            Some(pos) => {
                self.frames.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The animation frame fired: take every queued request.
    pub fn take_frames(&mut self) -> Vec<TaskHandle> {
        std::mem::take(&mut self.frames)
    }

    #[must_use]
    pub fn has_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Drain every browser timeout id (for teardown).
    pub fn drain_timeouts(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.timeouts).into_values().collect()
    }

    #[must_use]
    pub fn kind_of(&self, handle: TaskHandle) -> Option<TaskKind> {
        if self.timeouts.contains_key(&handle) {
            Some(TaskKind::Timeout)
        } else if self.frames.contains(&handle) {
            Some(TaskKind::Frame)
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timeouts.len() + self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
