#![forbid(unsafe_code)]

//! Host-driven page runner.
//!
//! [`Page`] owns the ambient signals, a [`ManualScheduler`], a [`LayoutMap`]
//! and a [`RecordingSurface`], and routes every fired handle to the engine
//! waiting on it. The host controls the loop:
//!
//! 1. Push input via [`Page::push_event`].
//! 2. Call [`Page::step`] with the elapsed time. Queued events are applied,
//!    due timers fire in order, then one display frame runs.
//! 3. Inspect engines and the surface.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::geometry::Size;
//! use folio_core::signal::Theme;
//! use folio_fx::{FxPolicy, ParticleConfig};
//! use folio_web::page::{Page, PageEvent};
//!
//! let mut page = Page::new(Size::new(800.0, 600.0), FxPolicy::default());
//! page.mount_particles(ParticleConfig::default()).unwrap();
//! page.push_event(PageEvent::SetTheme(Theme::Dark));
//! page.step(Duration::from_millis(16));
//! page.step(Duration::from_millis(16));
//! assert_eq!(page.surface().visible_circles(), 50);
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use folio_core::event::ElementEvent;
use folio_core::geometry::Size;
use folio_core::measure::{ElementId, Measure};
use folio_core::random::SeededRandom;
use folio_core::schedule::{Scheduler, TaskHandle};
use folio_core::signal::{ScrollMetrics, ScrollSignal, Theme, ThemeSignal};
use folio_core::{debug, trace};
use folio_fx::{
    ConfigError, FocusConfig, FocusTracker, FxPolicy, ParticleConfig, ParticleSimulator,
    ScrambleConfig, ScrambleReveal, ScrollThresholdConfig, ScrollThresholdToggle, TriggerMode,
};

use crate::layout::LayoutMap;
use crate::scheduler::ManualScheduler;
use crate::smooth_scroll::SmoothScroll;
use crate::surface::RecordingSurface;

/// Index of an engine mounted on a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(usize);

impl EngineId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Input delivered to a page by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Pointer, click or visibility event on a scramble element.
    Scramble(EngineId, ElementEvent),
    /// Pointer entered word `index` of a focus tracker.
    WordEnter(EngineId, usize),
    /// Pointer left the words of a focus tracker.
    WordLeave(EngineId),
    /// The user scrolled to `offset_y`.
    ScrollTo(f64),
    /// The site theme changed.
    SetTheme(Theme),
    /// Viewport resized.
    Resize(Size),
    /// The back-to-top control was activated.
    BackToTop,
}

/// What happened during one [`Page::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStep {
    /// Events applied from the queue.
    pub events_processed: u32,
    /// Timer handles fired.
    pub timers_fired: usize,
    /// Frame handles fired.
    pub frames_fired: usize,
    /// Frame index after this step (monotonically increasing).
    pub frame_idx: u64,
}

/// Single-page composition of every effect engine.
#[derive(Debug)]
pub struct Page {
    policy: FxPolicy,
    theme: ThemeSignal,
    scroll: ScrollSignal,
    scheduler: ManualScheduler,
    layout: LayoutMap,
    surface: RecordingSurface,
    glyphs: SeededRandom,
    queue: VecDeque<PageEvent>,
    scrambles: Vec<(ElementId, ScrambleReveal)>,
    focus: Vec<FocusTracker>,
    particles: Option<ParticleSimulator>,
    back_to_top: ScrollThresholdToggle,
    navbar: ScrollThresholdToggle,
    smooth_scroll: SmoothScroll,
    viewport: Size,
    next_owner: u32,
    frame_idx: u64,
}

impl Page {
    /// Create a page with a non-scrolling document of the viewport's height.
    #[must_use]
    pub fn new(viewport: Size, policy: FxPolicy) -> Self {
        let scroll = ScrollSignal::new(ScrollMetrics::new(0.0, viewport.height, viewport.height));
        let mut back_to_top = ScrollThresholdToggle::new(ScrollThresholdConfig::back_to_top());
        let mut navbar = ScrollThresholdToggle::new(ScrollThresholdConfig::navbar());
        back_to_top.mount(&scroll);
        navbar.mount(&scroll);
        Self {
            policy,
            theme: ThemeSignal::default(),
            scroll,
            scheduler: ManualScheduler::new(),
            layout: LayoutMap::new(viewport),
            surface: RecordingSurface::new(),
            glyphs: SeededRandom::new(policy.seed_for(0)),
            queue: VecDeque::new(),
            scrambles: Vec::new(),
            focus: Vec::new(),
            particles: None,
            back_to_top,
            navbar,
            smooth_scroll: SmoothScroll::default(),
            viewport,
            next_owner: 1,
            frame_idx: 0,
        }
    }

    /// Set the scrollable document height.
    pub fn set_document_height(&mut self, height: f64) {
        let mut metrics = self.scroll.current();
        metrics.document_height = height.max(metrics.viewport_height);
        metrics.offset_y = metrics.offset_y.clamp(0.0, metrics.max_offset());
        self.scroll.set(metrics);
    }

    // -- Mounting -----------------------------------------------------------

    /// Mount a scramble element showing `text`.
    pub fn add_scramble(
        &mut self,
        text: impl Into<String>,
        config: ScrambleConfig,
    ) -> Result<EngineId, ConfigError> {
        config.validate()?;
        let element = self.allocate_element();
        let reveal = ScrambleReveal::new(text, config).reduced_motion(self.policy.reduced_motion);
        self.scrambles.push((element, reveal));
        Ok(EngineId(self.scrambles.len() - 1))
    }

    /// Mount a focus tracker over `container`, whose words are laid out as
    /// its children.
    pub fn add_focus(
        &mut self,
        config: FocusConfig,
        container: ElementId,
    ) -> Result<EngineId, ConfigError> {
        config.validate()?;
        let mut tracker =
            FocusTracker::new(config, container).reduced_motion(self.policy.reduced_motion);
        tracker.mount(&mut self.scheduler, &self.layout);
        self.focus.push(tracker);
        Ok(EngineId(self.focus.len() - 1))
    }

    /// Mount the particle backdrop. Replaces any previous one.
    pub fn mount_particles(&mut self, config: ParticleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(mut old) = self.particles.take() {
            old.teardown(&mut self.scheduler, &mut self.surface);
        }
        let mut sim = ParticleSimulator::new(config, &self.theme, &self.scroll, &self.policy, 1);
        sim.mount(self.viewport, &mut self.scheduler, &mut self.surface);
        self.particles = Some(sim);
        Ok(())
    }

    /// Reserve a fresh element owner id.
    pub fn allocate_element(&mut self) -> ElementId {
        let id = ElementId::root(self.next_owner);
        self.next_owner += 1;
        id
    }

    /// Tear every engine down. Afterwards nothing is pending.
    pub fn unmount(&mut self) {
        for (_, reveal) in &mut self.scrambles {
            reveal.teardown(&mut self.scheduler);
        }
        for tracker in &mut self.focus {
            tracker.teardown(&mut self.scheduler);
        }
        if let Some(sim) = self.particles.as_mut() {
            sim.teardown(&mut self.scheduler, &mut self.surface);
        }
        self.back_to_top.unmount();
        self.navbar.unmount();
        self.smooth_scroll.cancel();
        self.queue.clear();
        debug!(pending = self.pending_tasks(), "page unmounted");
    }

    // -- Host loop ----------------------------------------------------------

    /// Queue an input for the next [`Self::step`].
    pub fn push_event(&mut self, event: PageEvent) {
        self.queue.push_back(event);
    }

    /// Apply queued events, advance time by `dt` firing due timers, then run
    /// one display frame.
    ///
    /// Highlight tweens advance by `dt` before the timers fire.
    pub fn step(&mut self, dt: Duration) -> PageStep {
        let mut events_processed = 0u32;
        while let Some(event) = self.queue.pop_front() {
            self.apply(event);
            events_processed += 1;
        }

        // Tweens started by this step's timers begin from zero next step.
        for tracker in &mut self.focus {
            tracker.advance(dt);
        }

        let deadline = self.scheduler.now().saturating_add(dt);
        let mut timers_fired = 0;
        while let Some(handle) = self.scheduler.pop_due(deadline) {
            self.dispatch_timer(handle);
            timers_fired += 1;
        }
        self.scheduler.settle(deadline);

        self.smooth_scroll.tick(&self.scroll);
        self.check_visibility();
        if let Some(sim) = self.particles.as_mut()
            && sim.needs_sync()
        {
            sim.sync(&mut self.scheduler, &mut self.surface);
        }

        let frames = self.scheduler.take_frames();
        for &handle in &frames {
            if let Some(sim) = self.particles.as_mut() {
                sim.on_frame(handle, &mut self.scheduler, &mut self.surface);
            }
        }
        self.frame_idx += 1;
        trace!(
            frame_idx = self.frame_idx,
            timers_fired,
            frames = frames.len(),
            "page step"
        );
        PageStep {
            events_processed,
            timers_fired,
            frames_fired: frames.len(),
            frame_idx: self.frame_idx,
        }
    }

    /// Step repeatedly in `frame` increments until `total` has elapsed.
    pub fn run_for(&mut self, total: Duration, frame: Duration) -> u64 {
        let mut elapsed = Duration::ZERO;
        let mut steps = 0;
        if frame.is_zero() {
            return 0;
        }
        while elapsed < total {
            let dt = frame.min(total - elapsed);
            self.step(dt);
            elapsed += dt;
            steps += 1;
        }
        steps
    }

    fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::Scramble(id, element_event) => {
                if let Some((_, reveal)) = self.scrambles.get_mut(id.0) {
                    reveal.handle_event(element_event, &mut self.scheduler, &mut self.glyphs);
                }
            }
            PageEvent::WordEnter(id, index) => {
                if let Some(tracker) = self.focus.get_mut(id.0) {
                    tracker.pointer_enter(index, &self.layout);
                }
            }
            PageEvent::WordLeave(id) => {
                if let Some(tracker) = self.focus.get_mut(id.0) {
                    tracker.pointer_leave(&self.layout);
                }
            }
            PageEvent::ScrollTo(offset) => {
                self.smooth_scroll.cancel();
                self.scroll.scroll_to(offset);
            }
            PageEvent::SetTheme(theme) => {
                self.theme.set(theme);
            }
            PageEvent::Resize(size) => self.resize(size),
            PageEvent::BackToTop => {
                let request = self.back_to_top.scroll_to_top();
                self.smooth_scroll.start(request, &self.scroll);
            }
        }
    }

    fn resize(&mut self, size: Size) {
        self.viewport = size;
        self.layout.set_viewport(size);
        let mut metrics = self.scroll.current();
        metrics.viewport_height = size.height;
        metrics.document_height = metrics.document_height.max(size.height);
        metrics.offset_y = metrics.offset_y.clamp(0.0, metrics.max_offset());
        self.scroll.set(metrics);
        if let Some(sim) = self.particles.as_mut() {
            sim.resize(size, &mut self.surface);
        }
        for tracker in &mut self.focus {
            tracker.layout_changed(&self.layout);
        }
    }

    fn dispatch_timer(&mut self, handle: TaskHandle) {
        for (_, reveal) in &mut self.scrambles {
            if reveal.on_timer(handle, &mut self.scheduler, &mut self.glyphs) {
                return;
            }
        }
        for tracker in &mut self.focus {
            if tracker.on_timer(handle, &mut self.scheduler, &self.layout) {
                return;
            }
        }
        trace!(handle = handle.raw(), "timer had no owner");
    }

    fn check_visibility(&mut self) {
        self.layout.set_scroll_offset(self.scroll.offset_y());
        for (element, reveal) in &mut self.scrambles {
            if reveal.config().trigger != TriggerMode::View {
                continue;
            }
            if self.layout.is_visible(*element) == Some(true) {
                reveal.handle_event(
                    ElementEvent::Visibility(true),
                    &mut self.scheduler,
                    &mut self.glyphs,
                );
            }
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub fn theme(&self) -> &ThemeSignal {
        &self.theme
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollSignal {
        &self.scroll
    }

    #[must_use]
    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutMap {
        &mut self.layout
    }

    #[must_use]
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RecordingSurface {
        &mut self.surface
    }

    #[must_use]
    pub fn scramble(&self, id: EngineId) -> Option<&ScrambleReveal> {
        self.scrambles.get(id.0).map(|(_, reveal)| reveal)
    }

    #[must_use]
    pub fn scramble_element(&self, id: EngineId) -> Option<ElementId> {
        self.scrambles.get(id.0).map(|(element, _)| *element)
    }

    #[must_use]
    pub fn focus(&self, id: EngineId) -> Option<&FocusTracker> {
        self.focus.get(id.0)
    }

    #[must_use]
    pub fn particles(&self) -> Option<&ParticleSimulator> {
        self.particles.as_ref()
    }

    #[must_use]
    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top.is_visible()
    }

    #[must_use]
    pub fn navbar_compact(&self) -> bool {
        self.navbar.is_visible()
    }

    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth_scroll.is_animating()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Timers and frame requests still outstanding across all engines.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub fn policy(&self) -> &FxPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::geometry::Rect;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn page() -> Page {
        Page::new(Size::new(800.0, 600.0), FxPolicy::default())
    }

    #[test]
    fn step_reports_work() {
        let mut page = page();
        let id = page
            .add_scramble("HELLO", ScrambleConfig::default().alphabet("X"))
            .unwrap();
        page.push_event(PageEvent::Scramble(id, ElementEvent::PointerEnter));
        let step = page.step(Duration::from_millis(50));
        assert_eq!(step.events_processed, 1);
        assert_eq!(step.timers_fired, 1);
        assert_eq!(step.frame_idx, 1);
    }

    #[test]
    fn scroll_drives_toggles() {
        let mut page = page();
        page.set_document_height(4000.0);
        page.push_event(PageEvent::ScrollTo(30.0));
        page.step(FRAME);
        assert!(page.navbar_compact());
        assert!(!page.back_to_top_visible());
        page.push_event(PageEvent::ScrollTo(900.0));
        page.step(FRAME);
        assert!(page.back_to_top_visible());
    }

    #[test]
    fn back_to_top_scrolls_smoothly_home() {
        let mut page = page();
        page.set_document_height(4000.0);
        page.push_event(PageEvent::ScrollTo(1200.0));
        page.push_event(PageEvent::BackToTop);
        page.step(FRAME);
        assert!(page.is_smooth_scrolling());
        assert!(page.scroll().offset_y() > 0.0);
        page.run_for(Duration::from_secs(2), FRAME);
        assert_eq!(page.scroll().offset_y(), 0.0);
        assert!(!page.back_to_top_visible());
    }

    #[test]
    fn view_trigger_fires_when_visible() {
        let mut page = page();
        let id = page
            .add_scramble("VIEW", ScrambleConfig::default().trigger(TriggerMode::View))
            .unwrap();
        let element = page.scramble_element(id).unwrap();
        page.layout_mut()
            .insert(element, Rect::new(0.0, 1000.0, 200.0, 40.0));
        page.step(FRAME);
        assert!(!page.scramble(id).unwrap().is_animating());
        page.layout_mut()
            .insert(element, Rect::new(0.0, 100.0, 200.0, 40.0));
        page.step(FRAME);
        assert!(page.scramble(id).unwrap().is_animating());
    }

    #[test]
    fn view_trigger_fires_when_scrolled_into_view() {
        let mut page = page();
        page.set_document_height(4000.0);
        let id = page
            .add_scramble("VIEW", ScrambleConfig::default().trigger(TriggerMode::View))
            .unwrap();
        let element = page.scramble_element(id).unwrap();
        page.layout_mut()
            .insert(element, Rect::new(0.0, 1000.0, 200.0, 40.0));
        page.step(FRAME);
        assert!(!page.scramble(id).unwrap().is_animating());
        page.push_event(PageEvent::ScrollTo(800.0));
        page.step(FRAME);
        assert!(page.scramble(id).unwrap().is_animating());
        assert_eq!(page.layout().viewport().map(|v| v.y), Some(800.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut page = page();
        assert_eq!(
            page.add_scramble("x", ScrambleConfig::default().alphabet("")),
            Err(ConfigError::EmptyAlphabet)
        );
        assert_eq!(
            page.mount_particles(ParticleConfig::default().population(0)),
            Err(ConfigError::EmptyPopulation)
        );
    }

    #[test]
    fn resize_updates_viewport_and_scroll() {
        let mut page = page();
        page.set_document_height(3000.0);
        page.push_event(PageEvent::Resize(Size::new(400.0, 1000.0)));
        page.step(FRAME);
        assert_eq!(page.scroll().current().viewport_height, 1000.0);
        assert_eq!(page.layout().viewport(), Some(Rect::new(0.0, 0.0, 400.0, 1000.0)));
    }
}
