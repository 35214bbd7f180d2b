#![forbid(unsafe_code)]

//! Scramble-reveal text animation.
//!
//! A run starts from a fully scrambled rendering of the target text and locks
//! positions to their true characters step by step until the whole string is
//! revealed. Unlocked positions are redrawn from the alphabet on every step.
//!
//! # State machine
//!
//! ```text
//! Idle ──trigger──▶ Running { iteration: 0 } ──tick──▶ … ──tick──▶ Done
//!  ▲                                                               │
//!  └──────────────────────── (next trigger) ◀──────────────────────┘
//! ```
//!
//! Each step is one [`Scheduler::set_timeout`] of `speed`; the host calls
//! [`ScrambleReveal::on_timer`] when it fires.
//!
//! # Invariants
//!
//! 1. While not running, `displayed() == target()`.
//! 2. The locked set at step `n` is a function of `n` and the direction only,
//!    and grows monotonically with `n`; locked positions never re-scramble.
//! 3. At most one timer is pending per instance; re-triggering a running
//!    instance changes nothing and schedules nothing.
//! 4. A run completes after exactly `max_iterations` ticks, bounding its
//!    duration to `speed × max_iterations`.
//!
//! # Failure Modes
//!
//! - Empty target or `max_iterations == 0`: the trigger completes immediately
//!   with zero steps.
//! - An alphabet that yields no glyph (empty `use_original_chars_only` source):
//!   unlocked positions show their true character.

use std::time::Duration;

use folio_core::event::ElementEvent;
use folio_core::random::GlyphSource;
use folio_core::schedule::{PendingTask, Scheduler, TaskHandle};
use folio_core::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::ConfigError;

/// Substitute characters used when none are configured.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*()_+";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Order in which positions lock during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RevealDirection {
    /// Lock from the start: `i < n`.
    #[default]
    Left,
    /// Lock from the end: `i > len - n`.
    Right,
    /// Lock outward from the middle: `|i - len/2| < n/2`.
    Center,
}

impl RevealDirection {
    /// Whether position `index` of a `len`-long string shows its true
    /// character at step `step`.
    ///
    /// The center rule is evaluated in floating point exactly as stated, so
    /// odd-length strings lock asymmetrically.
    #[must_use]
    pub fn is_locked(self, index: usize, len: usize, step: u32) -> bool {
        match self {
            Self::Left => (index as u64) < u64::from(step),
            Self::Right => (index as i64) > (len as i64) - i64::from(step),
            Self::Center => ((index as f64) - (len as f64) / 2.0).abs() < f64::from(step) / 2.0,
        }
    }
}

/// Which element event starts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TriggerMode {
    /// Pointer enter, whenever idle.
    #[default]
    Hover,
    /// Click, whenever idle.
    Click,
    /// First time the element becomes visible; never again afterwards.
    View,
}

/// Configuration for a [`ScrambleReveal`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrambleConfig {
    /// Delay between steps.
    /// Default: 50ms
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_ms", rename = "speed_ms"))]
    pub speed: Duration,

    /// Steps per run. Default: 10
    pub max_iterations: u32,

    /// Characters drawn for unlocked positions.
    pub alphabet: String,

    /// Event that starts a run. Default: hover
    pub trigger: TriggerMode,

    /// Lock order. Default: left
    pub direction: RevealDirection,

    /// Keep whitespace in place instead of scrambling it. Default: false
    pub preserve_whitespace: bool,

    /// Draw substitutes only from the target's own characters. Default: false
    pub use_original_chars_only: bool,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(50),
            max_iterations: 10,
            alphabet: DEFAULT_ALPHABET.to_owned(),
            trigger: TriggerMode::Hover,
            direction: RevealDirection::Left,
            preserve_whitespace: false,
            use_original_chars_only: false,
        }
    }
}

impl ScrambleConfig {
    #[must_use]
    pub fn speed(mut self, speed: Duration) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: TriggerMode) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: RevealDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    #[must_use]
    pub fn use_original_chars_only(mut self, only: bool) -> Self {
        self.use_original_chars_only = only;
        self
    }

    /// Reject configs that cannot animate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed.is_zero() {
            return Err(ConfigError::ZeroSpeed);
        }
        if !self.use_original_chars_only && self.alphabet.chars().next().is_none() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Lifecycle of a scramble instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScramblePhase {
    /// Never triggered.
    Idle,
    /// Step `iteration` is displayed and the next step is scheduled.
    Running { iteration: u32 },
    /// Last run finished (or was cancelled); may be triggered again.
    Done,
}

/// Byte range of one grapheme cluster in the target.
#[derive(Debug, Clone, Copy)]
struct Cluster {
    start: usize,
    end: usize,
    blank: bool,
}

/// Scramble-reveal animator bound to one text element.
#[derive(Debug)]
pub struct ScrambleReveal {
    config: ScrambleConfig,
    target: String,
    clusters: Vec<Cluster>,
    alphabet: Vec<char>,
    displayed: String,
    phase: ScramblePhase,
    view_fired: bool,
    reduced_motion: bool,
    pending: PendingTask,
}

impl ScrambleReveal {
    /// Create an idle animator displaying `target`.
    #[must_use]
    pub fn new(target: impl Into<String>, config: ScrambleConfig) -> Self {
        let target = target.into();
        let mut engine = Self {
            config,
            target: String::new(),
            clusters: Vec::new(),
            alphabet: Vec::new(),
            displayed: String::new(),
            phase: ScramblePhase::Idle,
            view_fired: false,
            reduced_motion: false,
            pending: PendingTask::new(),
        };
        engine.load_target(target);
        engine
    }

    /// Reveal instantly instead of animating (builder).
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    fn load_target(&mut self, target: String) {
        self.clusters = target
            .grapheme_indices(true)
            .map(|(start, g)| Cluster {
                start,
                end: start + g.len(),
                blank: g.chars().all(char::is_whitespace),
            })
            .collect();
        self.alphabet = if self.config.use_original_chars_only {
            let mut seen = Vec::new();
            for c in target.chars().filter(|c| !c.is_whitespace()) {
                if !seen.contains(&c) {
                    seen.push(c);
                }
            }
            seen
        } else {
            self.config.alphabet.chars().collect()
        };
        self.displayed.clone_from(&target);
        self.target = target;
    }

    // -- Outputs ------------------------------------------------------------

    /// Text to render right now.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Final text.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether a run is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, ScramblePhase::Running { .. })
    }

    #[must_use]
    pub fn phase(&self) -> ScramblePhase {
        self.phase
    }

    /// Steps taken in the current run (0 when not running).
    #[must_use]
    pub fn iteration(&self) -> u32 {
        match self.phase {
            ScramblePhase::Running { iteration } => iteration,
            ScramblePhase::Idle | ScramblePhase::Done => 0,
        }
    }

    /// Per-cluster lock state for the current step; all `true` when idle.
    #[must_use]
    pub fn locked_mask(&self) -> Vec<bool> {
        let len = self.clusters.len();
        match self.phase {
            ScramblePhase::Running { iteration } => (0..len)
                .map(|i| self.config.direction.is_locked(i, len, iteration))
                .collect(),
            ScramblePhase::Idle | ScramblePhase::Done => vec![true; len],
        }
    }

    /// The outstanding step timer, if any.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TaskHandle> {
        self.pending.handle()
    }

    #[must_use]
    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    // -- Inputs -------------------------------------------------------------

    /// Feed an element event; starts a run if it matches the trigger mode.
    ///
    /// Returns `true` if a timed run was started.
    pub fn handle_event(
        &mut self,
        event: ElementEvent,
        scheduler: &mut dyn Scheduler,
        glyphs: &mut dyn GlyphSource,
    ) -> bool {
        let matches = match (self.config.trigger, event) {
            (TriggerMode::Hover, ElementEvent::PointerEnter)
            | (TriggerMode::Click, ElementEvent::Click) => true,
            // A view arriving mid-run would be refused by `start`; keep the
            // one-shot armed for the next one.
            (TriggerMode::View, ElementEvent::Visibility(true))
                if !self.view_fired && !self.is_animating() =>
            {
                self.view_fired = true;
                true
            }
            _ => false,
        };
        matches && self.start(scheduler, glyphs)
    }

    /// Start a run regardless of trigger mode.
    ///
    /// No-op while a run is in progress. Returns `true` if a timed run was
    /// started; degenerate targets complete immediately and return `false`.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler, glyphs: &mut dyn GlyphSource) -> bool {
        if self.is_animating() {
            return false;
        }
        if self.clusters.is_empty() || self.config.max_iterations == 0 || self.reduced_motion {
            self.finish();
            debug!(target_len = self.clusters.len(), "scramble completed without steps");
            return false;
        }
        self.phase = ScramblePhase::Running { iteration: 0 };
        self.render(0, glyphs);
        self.pending.set_timeout(scheduler, self.config.speed);
        debug!(
            target_len = self.clusters.len(),
            max_iterations = self.config.max_iterations,
            "scramble run started"
        );
        true
    }

    /// Host callback for a fired timer.
    ///
    /// Returns `false` (and does nothing) if `handle` is not this instance's
    /// outstanding step.
    pub fn on_timer(
        &mut self,
        handle: TaskHandle,
        scheduler: &mut dyn Scheduler,
        glyphs: &mut dyn GlyphSource,
    ) -> bool {
        if !self.pending.fire(handle) {
            return false;
        }
        if self.tick(glyphs) {
            self.pending.set_timeout(scheduler, self.config.speed);
        }
        true
    }

    /// Advance one step without touching any scheduler.
    ///
    /// Returns `true` while the run continues.
    pub fn tick(&mut self, glyphs: &mut dyn GlyphSource) -> bool {
        let ScramblePhase::Running { iteration } = self.phase else {
            return false;
        };
        let next = iteration.saturating_add(1);
        if next >= self.config.max_iterations {
            self.finish();
            debug!("scramble run completed");
            return false;
        }
        self.phase = ScramblePhase::Running { iteration: next };
        self.render(next, glyphs);
        trace!(iteration = next, "scramble step");
        true
    }

    /// Replace the target text, cancelling any run in progress.
    pub fn retarget(&mut self, target: impl Into<String>, scheduler: &mut dyn Scheduler) {
        self.pending.cancel(scheduler);
        self.load_target(target.into());
        if self.is_animating() {
            self.phase = ScramblePhase::Done;
        }
    }

    /// Cancel pending work and show the target. Idempotent.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.pending.cancel(scheduler);
        if self.is_animating() {
            self.finish();
            debug!("scramble run cancelled");
        }
    }

    fn finish(&mut self) {
        self.phase = ScramblePhase::Done;
        self.displayed.clone_from(&self.target);
    }

    fn render(&mut self, step: u32, glyphs: &mut dyn GlyphSource) {
        let len = self.clusters.len();
        let direction = self.config.direction;
        let keep_blank = self.config.preserve_whitespace;
        self.displayed.clear();
        for (i, cluster) in self.clusters.iter().enumerate() {
            let original = &self.target[cluster.start..cluster.end];
            if direction.is_locked(i, len, step) || (keep_blank && cluster.blank) {
                self.displayed.push_str(original);
                continue;
            }
            match glyphs.next_glyph(&self.alphabet) {
                Some(glyph) => self.displayed.push(glyph),
                None => self.displayed.push_str(original),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::random::{ScriptedGlyphs, SeededRandom};
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct TestScheduler {
        next: u64,
        pending: BTreeSet<TaskHandle>,
        requested: usize,
    }

    impl Scheduler for TestScheduler {
        fn set_timeout(&mut self, _delay: Duration) -> TaskHandle {
            self.next += 1;
            self.requested += 1;
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

    impl TestScheduler {
        fn fire_next(&mut self) -> Option<TaskHandle> {
            let handle = *self.pending.iter().next()?;
            self.pending.remove(&handle);
            Some(handle)
        }
    }

    fn hello(direction: RevealDirection) -> ScrambleReveal {
        ScrambleReveal::new(
            "HELLO",
            ScrambleConfig::default()
                .max_iterations(5)
                .alphabet("X")
                .direction(direction),
        )
    }

    #[test]
    fn hello_left_reveal_sequence() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(1);
        let mut s = hello(RevealDirection::Left);
        assert_eq!(s.displayed(), "HELLO");

        assert!(s.start(&mut sched, &mut glyphs));
        let mut frames = vec![s.displayed().to_owned()];
        while let Some(handle) = sched.fire_next() {
            assert!(s.on_timer(handle, &mut sched, &mut glyphs));
            frames.push(s.displayed().to_owned());
        }
        assert_eq!(frames, ["XXXXX", "HXXXX", "HEXXX", "HELXX", "HELLX", "HELLO"]);
        assert!(!s.is_animating());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn right_and_center_lock_orders() {
        let mut glyphs = SeededRandom::new(1);
        let mut sched = TestScheduler::default();

        let mut right = hello(RevealDirection::Right);
        right.start(&mut sched, &mut glyphs);
        let mut seen = vec![right.displayed().to_owned()];
        while right.tick(&mut glyphs) {
            seen.push(right.displayed().to_owned());
        }
        assert_eq!(seen, ["XXXXX", "XXXXX", "XXXXO", "XXXLO", "XXLLO"]);

        let mut center = hello(RevealDirection::Center);
        center.start(&mut sched, &mut glyphs);
        let mut seen = vec![center.displayed().to_owned()];
        while center.tick(&mut glyphs) {
            seen.push(center.displayed().to_owned());
        }
        // len/2 = 2.5: indices 2 and 3 lock at step 2, 1 and 4 only at step 4.
        assert_eq!(seen, ["XXXXX", "XXXXX", "XXLLX", "XXLLX", "XELLO"]);
        assert_eq!(center.displayed(), "HELLO");
    }

    #[test]
    fn retrigger_while_running_is_noop() {
        let mut sched = TestScheduler::default();
        let mut glyphs = ScriptedGlyphs::new("#".chars());
        let mut s = hello(RevealDirection::Left);
        s.start(&mut sched, &mut glyphs);
        let first = sched.fire_next().unwrap_or(TaskHandle::from_raw(0));
        s.on_timer(first, &mut sched, &mut glyphs);

        let before = (s.iteration(), s.displayed().to_owned(), sched.requested);
        let drawn = glyphs.drawn();
        assert!(!s.handle_event(ElementEvent::PointerEnter, &mut sched, &mut glyphs));
        assert!(!s.start(&mut sched, &mut glyphs));
        assert_eq!((s.iteration(), s.displayed().to_owned(), sched.requested), before);
        assert_eq!(glyphs.drawn(), drawn);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn empty_target_completes_immediately() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(3);
        let mut s = ScrambleReveal::new("", ScrambleConfig::default());
        assert!(!s.start(&mut sched, &mut glyphs));
        assert_eq!(s.phase(), ScramblePhase::Done);
        assert_eq!(s.displayed(), "");
        assert_eq!(sched.requested, 0);
    }

    #[test]
    fn trigger_modes() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(3);

        let mut click = ScrambleReveal::new("hi", ScrambleConfig::default().trigger(TriggerMode::Click));
        assert!(!click.handle_event(ElementEvent::PointerEnter, &mut sched, &mut glyphs));
        assert!(click.handle_event(ElementEvent::Click, &mut sched, &mut glyphs));

        let mut hover = ScrambleReveal::new("hi", ScrambleConfig::default());
        assert!(!hover.handle_event(ElementEvent::Click, &mut sched, &mut glyphs));
        assert!(hover.handle_event(ElementEvent::PointerEnter, &mut sched, &mut glyphs));
    }

    #[test]
    fn view_trigger_fires_once_per_instance() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(3);
        let mut s = ScrambleReveal::new(
            "hi",
            ScrambleConfig::default().trigger(TriggerMode::View).max_iterations(1),
        );
        assert!(!s.handle_event(ElementEvent::Visibility(false), &mut sched, &mut glyphs));
        assert!(s.handle_event(ElementEvent::Visibility(true), &mut sched, &mut glyphs));
        let h = sched.fire_next().unwrap_or(TaskHandle::from_raw(0));
        s.on_timer(h, &mut sched, &mut glyphs);
        assert!(!s.is_animating());
        assert!(!s.handle_event(ElementEvent::Visibility(true), &mut sched, &mut glyphs));
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn view_during_manual_run_stays_armed() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(3);
        let mut s = ScrambleReveal::new(
            "hi",
            ScrambleConfig::default().trigger(TriggerMode::View).max_iterations(2),
        );
        assert!(s.start(&mut sched, &mut glyphs));
        assert!(!s.handle_event(ElementEvent::Visibility(true), &mut sched, &mut glyphs));
        while let Some(h) = sched.fire_next() {
            s.on_timer(h, &mut sched, &mut glyphs);
        }
        assert!(!s.is_animating());

        assert!(s.handle_event(ElementEvent::Visibility(true), &mut sched, &mut glyphs));
        while let Some(h) = sched.fire_next() {
            s.on_timer(h, &mut sched, &mut glyphs);
        }
        assert!(!s.handle_event(ElementEvent::Visibility(true), &mut sched, &mut glyphs));
    }

    #[test]
    fn teardown_cancels_and_restores_target() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(5);
        let mut s = ScrambleReveal::new("portfolio", ScrambleConfig::default());
        s.start(&mut sched, &mut glyphs);
        let stale = s.pending_timer();
        s.teardown(&mut sched);
        s.teardown(&mut sched);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(s.displayed(), "portfolio");
        assert!(!s.is_animating());
        if let Some(stale) = stale {
            assert!(!s.on_timer(stale, &mut sched, &mut glyphs));
        }
        assert_eq!(s.displayed(), "portfolio");
    }

    #[test]
    fn retarget_mid_run_cancels() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(5);
        let mut s = ScrambleReveal::new("old", ScrambleConfig::default());
        s.start(&mut sched, &mut glyphs);
        s.retarget("new text", &mut sched);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(s.displayed(), "new text");
        assert!(!s.is_animating());
        assert!(s.start(&mut sched, &mut glyphs));
    }

    #[test]
    fn whitespace_can_be_preserved() {
        let mut sched = TestScheduler::default();
        let mut glyphs = ScriptedGlyphs::new("*".chars());
        let mut s = ScrambleReveal::new(
            "a b",
            ScrambleConfig::default().preserve_whitespace(true),
        );
        s.start(&mut sched, &mut glyphs);
        assert_eq!(s.displayed(), "* *");
    }

    #[test]
    fn original_chars_only_draws_from_target() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(11);
        let mut s = ScrambleReveal::new(
            "abc abc",
            ScrambleConfig::default().use_original_chars_only(true).alphabet(""),
        );
        assert!(s.config().validate().is_ok());
        s.start(&mut sched, &mut glyphs);
        assert!(s.displayed().chars().all(|c| "abc".contains(c)));
    }

    #[test]
    fn reduced_motion_reveals_instantly() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(11);
        let mut s = ScrambleReveal::new("hey", ScrambleConfig::default()).reduced_motion(true);
        assert!(!s.start(&mut sched, &mut glyphs));
        assert_eq!(s.displayed(), "hey");
        assert_eq!(sched.requested, 0);
    }

    #[test]
    fn graphemes_scramble_as_units() {
        let mut sched = TestScheduler::default();
        let mut glyphs = ScriptedGlyphs::new("x".chars());
        let mut s = ScrambleReveal::new(
            "e\u{301}a",
            ScrambleConfig::default().max_iterations(3),
        );
        s.start(&mut sched, &mut glyphs);
        assert_eq!(s.displayed(), "xx");
        s.tick(&mut glyphs);
        assert_eq!(s.displayed(), "e\u{301}x");
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        assert_eq!(
            ScrambleConfig::default().speed(Duration::ZERO).validate(),
            Err(ConfigError::ZeroSpeed)
        );
        assert_eq!(
            ScrambleConfig::default().alphabet("").validate(),
            Err(ConfigError::EmptyAlphabet)
        );
        assert!(ScrambleConfig::default().validate().is_ok());
    }

    #[test]
    fn locked_mask_tracks_iteration() {
        let mut sched = TestScheduler::default();
        let mut glyphs = SeededRandom::new(1);
        let mut s = hello(RevealDirection::Left);
        assert_eq!(s.locked_mask(), vec![true; 5]);
        s.start(&mut sched, &mut glyphs);
        s.tick(&mut glyphs);
        s.tick(&mut glyphs);
        assert_eq!(s.locked_mask(), vec![true, true, false, false, false]);
    }
}
