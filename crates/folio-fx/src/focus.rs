#![forbid(unsafe_code)]

//! Focus tracker: highlights one word of a sentence at a time.
//!
//! In automatic mode the highlight cycles through the words on a fixed
//! period; in manual mode it follows the pointer and falls back to the last
//! hovered word when the pointer leaves.
//!
//! The highlight rectangle is derived, never set directly: after every index
//! change the active word is measured relative to the container, and the
//! overlay tweens toward that rectangle over `animation_duration`.
//!
//! # Invariants
//!
//! 1. `active_index() < words().len()` whenever there is at least one word.
//! 2. Automatic mode keeps exactly one cycle timer pending; manual mode none.
//! 3. `focus_box()` always reflects the active index as of the last successful
//!    measurement; a failed measurement leaves the previous box in place and
//!    the next index change back onto that word measures it again.
//!
//! # Failure Modes
//!
//! - Word or container not mounted: recomputation is skipped.
//! - Empty sentence: every operation is a no-op and no timer is scheduled.

use std::time::Duration;

use folio_core::animation::{Animation, Fade, ease_in_out};
use folio_core::geometry::Rect;
use folio_core::measure::{ElementId, Measure};
use folio_core::schedule::{PendingTask, Scheduler, TaskHandle};
use folio_core::{debug, trace};

use crate::error::{ConfigError, check_seconds};
use crate::surface::Rgba;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`FocusTracker`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FocusConfig {
    /// Sentence to split on whitespace.
    pub sentence: String,

    /// Follow the pointer instead of cycling. Default: false
    pub manual_mode: bool,

    /// Highlight tween length in seconds. Default: 0.5
    pub animation_duration: f64,

    /// Dwell time after each tween in seconds. Default: 1.0
    pub pause_between_animations: f64,

    /// Blur radius in pixels for non-active words. Default: 5.0
    pub blur_amount: f64,

    /// Corner bracket color of the highlight.
    pub border_color: Rgba,

    /// Glow color of the highlight.
    pub glow_color: Rgba,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            sentence: "True Focus".to_owned(),
            manual_mode: false,
            animation_duration: 0.5,
            pause_between_animations: 1.0,
            blur_amount: 5.0,
            border_color: Rgba::new(0, 128, 0, 1.0),
            glow_color: Rgba::new(0, 255, 0, 0.6),
        }
    }
}

impl FocusConfig {
    #[must_use]
    pub fn sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = sentence.into();
        self
    }

    #[must_use]
    pub fn manual_mode(mut self, manual: bool) -> Self {
        self.manual_mode = manual;
        self
    }

    #[must_use]
    pub fn animation_duration(mut self, seconds: f64) -> Self {
        self.animation_duration = seconds;
        self
    }

    #[must_use]
    pub fn pause_between_animations(mut self, seconds: f64) -> Self {
        self.pause_between_animations = seconds;
        self
    }

    #[must_use]
    pub fn blur_amount(mut self, px: f64) -> Self {
        self.blur_amount = px;
        self
    }

    /// Automatic-mode period: tween plus pause.
    ///
    /// `None` if the sum is not a positive, representable duration.
    #[must_use]
    pub fn cycle_period(&self) -> Option<Duration> {
        let secs = self.animation_duration + self.pause_between_animations;
        Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|period| !period.is_zero())
    }

    /// Tween length as a duration (zero if invalid).
    #[must_use]
    pub fn tween_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.animation_duration).unwrap_or(Duration::ZERO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_seconds("animation_duration", self.animation_duration)?;
        check_seconds("pause_between_animations", self.pause_between_animations)?;
        check_seconds("blur_amount", self.blur_amount)?;
        if !self.manual_mode && self.cycle_period().is_none() {
            return Err(ConfigError::ZeroCyclePeriod);
        }
        Ok(())
    }
}

/// How the active word is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusMode {
    /// Timer-driven cycling.
    Automatic,
    /// Pointer-driven selection.
    Manual,
}

// ---------------------------------------------------------------------------
// Highlight overlay
// ---------------------------------------------------------------------------

/// Tweened highlight rectangle.
///
/// The first placement snaps; later retargets tween from wherever the overlay
/// currently is, so an interrupted tween continues smoothly.
#[derive(Debug, Clone, Copy)]
pub struct HighlightOverlay {
    from: Rect,
    to: Rect,
    fade: Fade,
    placed: bool,
}

impl Default for HighlightOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            from: Rect::default(),
            to: Rect::default(),
            fade: Fade::finished(),
            placed: false,
        }
    }

    /// Start moving toward `to`. `snap` jumps there immediately.
    pub fn retarget(&mut self, to: Rect, duration: Duration, snap: bool) {
        if !self.placed || snap || duration.is_zero() {
            self.from = to;
            self.to = to;
            self.fade = Fade::finished();
            self.placed = true;
            return;
        }
        self.from = self.current().unwrap_or(to);
        self.to = to;
        self.fade = Fade::new(duration).easing(ease_in_out);
    }

    /// Advance the tween.
    pub fn advance(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    /// Current rectangle, or `None` before the first placement.
    #[must_use]
    pub fn current(&self) -> Option<Rect> {
        self.placed
            .then(|| self.from.lerp(&self.to, f64::from(self.fade.value())))
    }

    /// Destination of the running tween.
    #[must_use]
    pub fn target(&self) -> Option<Rect> {
        self.placed.then_some(self.to)
    }

    /// Whether the tween has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.fade.is_complete()
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Word highlighter bound to a container element.
///
/// Word `i` is expected at element [`ElementId::child`]`(i)` of the container.
#[derive(Debug)]
pub struct FocusTracker {
    config: FocusConfig,
    words: Vec<String>,
    container: ElementId,
    mode: FocusMode,
    active: usize,
    last_active: Option<usize>,
    focus_box: Option<Rect>,
    /// Word index `focus_box` was measured for.
    measured: Option<usize>,
    overlay: HighlightOverlay,
    reduced_motion: bool,
    pending: PendingTask,
}

impl FocusTracker {
    #[must_use]
    pub fn new(config: FocusConfig, container: ElementId) -> Self {
        let words = config
            .sentence
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        let mode = if config.manual_mode {
            FocusMode::Manual
        } else {
            FocusMode::Automatic
        };
        Self {
            config,
            words,
            container,
            mode,
            active: 0,
            last_active: None,
            focus_box: None,
            measured: None,
            overlay: HighlightOverlay::new(),
            reduced_motion: false,
            pending: PendingTask::new(),
        }
    }

    /// Snap the highlight instead of tweening (builder).
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    // -- Outputs ------------------------------------------------------------

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn last_active_index(&self) -> Option<usize> {
        self.last_active
    }

    #[must_use]
    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    /// Active word rectangle relative to the container, as last measured.
    #[must_use]
    pub fn focus_box(&self) -> Option<Rect> {
        self.focus_box
    }

    /// Where the highlight is drawn right now (mid-tween).
    #[must_use]
    pub fn overlay_rect(&self) -> Option<Rect> {
        self.overlay.current()
    }

    #[must_use]
    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    /// Whether word `index` renders blurred.
    #[must_use]
    pub fn is_word_blurred(&self, index: usize) -> bool {
        index != self.active
    }

    #[must_use]
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Element expected to hold word `index`.
    #[must_use]
    pub fn word_element(&self, index: usize) -> ElementId {
        self.container.child(index)
    }

    #[must_use]
    pub fn pending_timer(&self) -> Option<TaskHandle> {
        self.pending.handle()
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Measure the initial highlight and, in automatic mode, start cycling.
    pub fn mount(&mut self, scheduler: &mut dyn Scheduler, measure: &dyn Measure) {
        self.recompute(measure);
        if self.mode == FocusMode::Automatic {
            self.schedule_cycle(scheduler);
        }
    }

    /// Cancel the cycle timer. Idempotent.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        if self.pending.cancel(scheduler) {
            debug!("focus cycle cancelled");
        }
    }

    /// Switch between automatic and manual selection.
    pub fn set_mode(&mut self, mode: FocusMode, scheduler: &mut dyn Scheduler) {
        if mode == self.mode {
            return;
        }
        self.pending.cancel(scheduler);
        self.mode = mode;
        if mode == FocusMode::Automatic {
            self.schedule_cycle(scheduler);
        }
        debug!(?mode, "focus mode changed");
    }

    fn schedule_cycle(&mut self, scheduler: &mut dyn Scheduler) {
        if self.words.is_empty() {
            return;
        }
        if let Some(period) = self.config.cycle_period() {
            self.pending.set_timeout(scheduler, period);
        }
    }

    // -- Inputs -------------------------------------------------------------

    /// Host callback for a fired timer. Returns `false` for foreign handles.
    pub fn on_timer(
        &mut self,
        handle: TaskHandle,
        scheduler: &mut dyn Scheduler,
        measure: &dyn Measure,
    ) -> bool {
        if !self.pending.fire(handle) {
            return false;
        }
        if self.mode != FocusMode::Automatic || self.words.is_empty() {
            return true;
        }
        let next = (self.active + 1) % self.words.len();
        self.set_active(next, measure);
        self.schedule_cycle(scheduler);
        true
    }

    /// Pointer entered word `index` (manual mode only).
    pub fn pointer_enter(&mut self, index: usize, measure: &dyn Measure) -> bool {
        if self.mode != FocusMode::Manual || index >= self.words.len() {
            return false;
        }
        self.last_active = Some(index);
        self.set_active(index, measure);
        true
    }

    /// Pointer left the words (manual mode only): restore the last hovered
    /// word, or the first one if none was ever hovered.
    pub fn pointer_leave(&mut self, measure: &dyn Measure) -> bool {
        if self.mode != FocusMode::Manual || self.words.is_empty() {
            return false;
        }
        self.set_active(self.last_active.unwrap_or(0), measure);
        true
    }

    /// Layout moved (resize, fonts loaded): re-measure the active word.
    pub fn layout_changed(&mut self, measure: &dyn Measure) -> bool {
        self.recompute(measure)
    }

    /// Advance the highlight tween.
    pub fn advance(&mut self, dt: Duration) {
        self.overlay.advance(dt);
    }

    fn set_active(&mut self, index: usize, measure: &dyn Measure) {
        if index == self.active && self.measured == Some(index) {
            return;
        }
        self.active = index;
        trace!(index, "focus index changed");
        self.recompute(measure);
    }

    /// Measure the active word relative to the container.
    ///
    /// Returns `false` and keeps the previous box if either element cannot be
    /// measured.
    pub fn recompute(&mut self, measure: &dyn Measure) -> bool {
        if self.words.is_empty() {
            return false;
        }
        let word = measure.measure(self.word_element(self.active));
        let container = measure.measure(self.container);
        let (Some(word), Some(container)) = (word, container) else {
            trace!(index = self.active, "focus measurement skipped");
            return false;
        };
        let rect = word.relative_to(&container);
        self.focus_box = Some(rect);
        self.measured = Some(self.active);
        self.overlay
            .retarget(rect, self.config.tween_duration(), self.reduced_motion);
        true
    }
}
