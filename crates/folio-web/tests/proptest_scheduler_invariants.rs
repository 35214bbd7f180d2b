//! Property-based invariant tests for the virtual-time scheduler.
//!
//! 1. Timeouts fire in non-decreasing due order, each exactly once.
//! 2. How the host slices time does not change which timeouts fire.
//! 3. Cancelled handles never fire.

use core::time::Duration;

use folio_core::schedule::{Scheduler, TaskHandle};
use folio_web::ManualScheduler;
use proptest::prelude::*;

fn schedule_all(sched: &mut ManualScheduler, delays: &[u64]) -> Vec<(TaskHandle, Duration)> {
    delays
        .iter()
        .map(|&ms| {
            let delay = Duration::from_millis(ms);
            (sched.set_timeout(delay), delay)
        })
        .collect()
}

fn drain(sched: &mut ManualScheduler, slices: &[u64], total: u64) -> Vec<(TaskHandle, Duration)> {
    let mut fired = Vec::new();
    let mut elapsed = 0;
    for &slice in slices.iter().cycle().take(1000) {
        if elapsed >= total {
            break;
        }
        let dt = slice.min(total - elapsed);
        sched.advance(Duration::from_millis(dt), |s, h| fired.push((h, s.now())));
        elapsed += dt;
    }
    fired
}

proptest! {
    #[test]
    fn fires_in_due_order_once(
        delays in proptest::collection::vec(0u64..500, 1..30),
        slices in proptest::collection::vec(1u64..120, 1..8),
    ) {
        let mut sched = ManualScheduler::new();
        let scheduled = schedule_all(&mut sched, &delays);
        let fired = drain(&mut sched, &slices, 500);

        prop_assert_eq!(fired.len(), scheduled.len());
        prop_assert_eq!(sched.pending_count(), 0);
        for pair in fired.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
        for (handle, at) in &fired {
            let due = scheduled.iter().find(|(h, _)| h == handle).map(|(_, d)| *d);
            prop_assert_eq!(due, Some(*at));
        }
    }

    #[test]
    fn slicing_does_not_change_outcome(
        delays in proptest::collection::vec(0u64..300, 1..20),
        slices in proptest::collection::vec(1u64..50, 1..6),
    ) {
        let mut coarse = ManualScheduler::new();
        let mut fine = ManualScheduler::new();
        schedule_all(&mut coarse, &delays);
        schedule_all(&mut fine, &delays);
        let a = drain(&mut coarse, &[300], 300);
        let b = drain(&mut fine, &slices, 300);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn cancelled_never_fire(
        delays in proptest::collection::vec(0u64..200, 1..20),
        mask in proptest::collection::vec(any::<bool>(), 20),
    ) {
        let mut sched = ManualScheduler::new();
        let scheduled = schedule_all(&mut sched, &delays);
        let mut cancelled = Vec::new();
        for ((handle, _), &cancel) in scheduled.iter().zip(&mask) {
            if cancel {
                prop_assert!(sched.cancel(*handle));
                cancelled.push(*handle);
            }
        }
        let fired = drain(&mut sched, &[17], 200);
        prop_assert!(fired.iter().all(|(h, _)| !cancelled.contains(h)));
        prop_assert_eq!(fired.len() + cancelled.len(), delays.len());
    }
}
