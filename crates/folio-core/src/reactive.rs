#![forbid(unsafe_code)]

//! Change-tracked shared values.
//!
//! - [`Observable`]: a shared, version-tracked value with subscriber
//!   callbacks.
//! - [`Subscription`]: RAII guard that detaches its callback on drop.
//! - [`Watch`]: a subscription that latches the most recent change so a
//!   state machine can poll it on its own schedule.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscriptions hold only a `Weak` reference back, so a
//! subscription outliving its observable is harmless.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. A detached subscription is never invoked again, even if it was
//!    detached from inside another subscriber's callback.
//! 5. Callbacks run with no internal borrow held, so they may read, set, or
//!    subscribe to the same observable.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    id: u64,
    live: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct Inner<T> {
    value: T,
    version: u64,
    next_id: u64,
    slots: Vec<Slot<T>>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.slots.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of changes applied since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Replace the value and notify subscribers if it changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
            let callbacks: Vec<(Rc<Cell<bool>>, Callback<T>)> = inner
                .slots
                .iter()
                .map(|slot| (Rc::clone(&slot.live), Rc::clone(&slot.callback)))
                .collect();
            (inner.value.clone(), callbacks)
        };
        let (value, callbacks) = snapshot;
        for (live, callback) in callbacks {
            if live.get() {
                callback(&value);
            }
        }
        true
    }

    /// Modify the value in place; notifies only if the result differs.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Attach a callback invoked with the new value after every change.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let live = Rc::new(Cell::new(true));
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.slots.push(Slot {
                id,
                live: Rc::clone(&live),
                callback: Rc::new(callback),
            });
            id
        };
        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                live.set(false);
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().slots.retain(|slot| slot.id != id);
                }
            })),
        }
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping the guard detaches the callback. [`unsubscribe`](Self::unsubscribe)
/// does the same eagerly and is safe to call any number of times.
#[must_use = "dropping a Subscription detaches its callback immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the callback. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    /// Whether the callback is still attached.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Latches the latest change of an [`Observable`] until taken.
///
/// Engines that advance on their own tick (frame callbacks, timers) use a
/// watch instead of reacting inside the notification callback.
pub struct Watch<T> {
    latest: Rc<RefCell<Option<T>>>,
    subscription: Subscription,
}

impl<T: Clone + PartialEq + 'static> Watch<T> {
    /// Start watching `source`. Changes before this call are not reported.
    #[must_use]
    pub fn new(source: &Observable<T>) -> Self {
        let latest = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&latest);
        let subscription = source.subscribe(move |value: &T| {
            *sink.borrow_mut() = Some(value.clone());
        });
        Self {
            latest,
            subscription,
        }
    }

    /// Take the most recent unseen value, if any.
    pub fn take(&self) -> Option<T> {
        self.latest.borrow_mut().take()
    }

    /// Whether a change is waiting to be taken.
    #[must_use]
    pub fn has_change(&self) -> bool {
        self.latest.borrow().is_some()
    }

    /// Stop watching. Idempotent; pending changes are discarded.
    pub fn close(&mut self) {
        self.subscription.unsubscribe();
        self.latest.borrow_mut().take();
    }

    /// Whether the underlying subscription is still attached.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.subscription.is_active()
    }
}

impl<T> fmt::Debug for Watch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("open", &self.subscription.is_active())
            .finish_non_exhaustive()
    }
}
