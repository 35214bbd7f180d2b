#![forbid(unsafe_code)]

//! Particle field backdrop shown while the site is in dark mode.
//!
//! [`ParticleField`] is the pure simulation: a fixed population of circles
//! drifting at constant velocity and bouncing off the bounds.
//! [`ParticleSimulator`] binds a field to the theme and scroll signals, the
//! frame scheduler, and a drawing [`Surface`].
//!
//! # Invariants
//!
//! 1. The field always holds exactly `population` particles.
//! 2. A particle that leaves `[0, dimension]` on an axis has that velocity
//!    component negated on the same step; it is never clamped or removed.
//! 3. While inactive the simulator has no frame pending and performs no
//!    surface calls; a stale frame firing is a no-op.
//!
//! # Failure Modes
//!
//! - Zero-sized viewport: the field is built with every particle at the
//!   origin and they bounce in place.
//! - Particles disabled by policy: the simulator never activates.

use folio_core::geometry::Size;
use folio_core::random::{RandomSource, SeededRandom};
use folio_core::reactive::Watch;
use folio_core::schedule::{PendingTask, Scheduler, TaskHandle};
use folio_core::signal::{ScrollMetrics, ScrollSignal, Theme, ThemeSignal};
use folio_core::{debug, trace};

use crate::error::{ConfigError, check_range};
use crate::policy::FxPolicy;
use crate::surface::{Rgba, Surface};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the particle field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    /// Number of particles. Default: 50
    pub population: usize,
    /// Smallest radius (inclusive). Default: 1.0
    pub size_min: f64,
    /// Largest radius (exclusive). Default: 3.0
    pub size_max: f64,
    /// Velocity lower bound per axis, px/frame. Default: -0.25
    pub velocity_min: f64,
    /// Velocity upper bound per axis, px/frame. Default: 0.25
    pub velocity_max: f64,
    /// Vertical translation at full scroll progress, px. Default: 100.0
    pub max_offset: f64,
    /// Fill color in dark mode.
    pub color_dark: Rgba,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            population: 50,
            size_min: 1.0,
            size_max: 3.0,
            velocity_min: -0.25,
            velocity_max: 0.25,
            max_offset: 100.0,
            color_dark: Rgba::new(255, 255, 255, 0.5),
        }
    }
}

impl ParticleConfig {
    #[must_use]
    pub fn population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    #[must_use]
    pub fn size_range(mut self, min: f64, max: f64) -> Self {
        self.size_min = min;
        self.size_max = max;
        self
    }

    #[must_use]
    pub fn velocity_range(mut self, min: f64, max: f64) -> Self {
        self.velocity_min = min;
        self.velocity_max = max;
        self
    }

    #[must_use]
    pub fn max_offset(mut self, px: f64) -> Self {
        self.max_offset = px;
        self
    }

    #[must_use]
    pub fn color_dark(mut self, color: Rgba) -> Self {
        self.color_dark = color;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        check_range("size", self.size_min, self.size_max)?;
        check_range("velocity", self.velocity_min, self.velocity_max)?;
        if !self.max_offset.is_finite() {
            return Err(ConfigError::InvalidDuration {
                field: "max_offset",
                value: self.max_offset,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// One drifting circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Radius in pixels.
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Particle {
    /// Move by one frame of velocity and bounce off the bounds.
    ///
    /// A component flips only while it still points outward, so a particle
    /// left outside (e.g. by a shrinking resize) heads back in instead of
    /// oscillating past the edge.
    pub fn step(&mut self, bounds: Size) {
        self.x += self.vx;
        self.y += self.vy;
        if (self.x < 0.0 && self.vx < 0.0) || (self.x > bounds.width && self.vx > 0.0) {
            self.vx = -self.vx;
        }
        if (self.y < 0.0 && self.vy < 0.0) || (self.y > bounds.height && self.vy > 0.0) {
            self.vy = -self.vy;
        }
    }
}

/// Fixed population of particles inside a bounding size.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Size,
}

impl ParticleField {
    /// Scatter `config.population` particles uniformly over `bounds`.
    #[must_use]
    pub fn new(config: &ParticleConfig, bounds: Size, rng: &mut dyn RandomSource) -> Self {
        let width = bounds.width.max(0.0);
        let height = bounds.height.max(0.0);
        let particles = (0..config.population)
            .map(|_| Particle {
                x: rng.range_f64(0.0, width),
                y: rng.range_f64(0.0, height),
                size: rng.range_f64(config.size_min, config.size_max),
                vx: rng.range_f64(config.velocity_min, config.velocity_max),
                vy: rng.range_f64(config.velocity_min, config.velocity_max),
            })
            .collect();
        Self { particles, bounds }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    /// Change the bounds. Particles outside the new bounds are pulled onto
    /// the nearest edge; everything else keeps its position and velocity.
    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
        let width = bounds.width.max(0.0);
        let height = bounds.height.max(0.0);
        for particle in &mut self.particles {
            particle.x = particle.x.clamp(0.0, width);
            particle.y = particle.y.clamp(0.0, height);
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Fill one circle per particle.
    pub fn draw(&self, surface: &mut dyn Surface, color: Rgba) {
        for p in &self.particles {
            surface.fill_circle(p.x, p.y, p.size, color);
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Theme-gated, scroll-linked particle backdrop.
#[derive(Debug)]
pub struct ParticleSimulator {
    config: ParticleConfig,
    theme: ThemeSignal,
    theme_watch: Watch<Theme>,
    scroll: ScrollSignal,
    scroll_watch: Option<Watch<ScrollMetrics>>,
    rng: SeededRandom,
    field: Option<ParticleField>,
    viewport: Size,
    pending: PendingTask,
    reduced_motion: bool,
    enabled: bool,
    mounted: bool,
    translate_y: f64,
    frames: u64,
}

impl ParticleSimulator {
    #[must_use]
    pub fn new(
        config: ParticleConfig,
        theme: &ThemeSignal,
        scroll: &ScrollSignal,
        policy: &FxPolicy,
        instance: u32,
    ) -> Self {
        Self {
            config,
            theme: theme.clone(),
            theme_watch: theme.watch(),
            scroll: scroll.clone(),
            scroll_watch: None,
            rng: SeededRandom::new(policy.seed_for(instance)),
            field: None,
            viewport: Size::default(),
            pending: PendingTask::new(),
            reduced_motion: policy.reduced_motion,
            enabled: policy.particles,
            mounted: false,
            translate_y: 0.0,
            frames: 0,
        }
    }

    // -- Outputs ------------------------------------------------------------

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    #[must_use]
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    /// Last translation applied to the surface.
    #[must_use]
    pub fn translate_y(&self) -> f64 {
        self.translate_y
    }

    /// Frames drawn since construction.
    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn pending_frame(&self) -> Option<TaskHandle> {
        self.pending.handle()
    }

    /// Whether a theme or scroll change is waiting for [`Self::sync`].
    #[must_use]
    pub fn needs_sync(&self) -> bool {
        self.theme_watch.has_change()
            || self.scroll_watch.as_ref().is_some_and(Watch::has_change)
    }

    #[must_use]
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Attach to a viewport and activate if the theme is already dark.
    pub fn mount(
        &mut self,
        viewport: Size,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn Surface,
    ) {
        self.viewport = viewport;
        self.mounted = true;
        self.sync(scheduler, surface);
    }

    /// Reconcile activation with the current theme and apply any scroll
    /// change. Call after either signal notifies.
    pub fn sync(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn Surface) {
        self.theme_watch.take();
        let want = self.mounted && self.enabled && self.theme.current().is_dark();
        match (want, self.is_active()) {
            (true, false) => self.activate(scheduler, surface),
            (false, true) => self.deactivate(scheduler, surface),
            _ => {}
        }
        if self.is_active() {
            self.apply_scroll(surface);
        }
    }

    /// Host callback for a fired frame. Returns `false` for foreign handles.
    pub fn on_frame(
        &mut self,
        handle: TaskHandle,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn Surface,
    ) -> bool {
        if !self.pending.fire(handle) {
            return false;
        }
        self.theme_watch.take();
        if !self.theme.current().is_dark() {
            self.deactivate(scheduler, surface);
            return true;
        }
        self.apply_scroll(surface);
        let color = self.config.color_dark;
        let Some(field) = self.field.as_mut() else {
            return true;
        };
        field.step();
        surface.clear();
        field.draw(surface, color);
        self.frames += 1;
        self.pending.request_frame(scheduler);
        true
    }

    /// Viewport changed: resize the surface and re-bound the field.
    pub fn resize(&mut self, viewport: Size, surface: &mut dyn Surface) {
        self.viewport = viewport;
        let Some(field) = self.field.as_mut() else {
            return;
        };
        field.resize(viewport);
        surface.resize(viewport);
        if self.reduced_motion {
            field.draw(surface, self.config.color_dark);
        }
    }

    /// Stop the loop and clear the canvas. Idempotent.
    pub fn deactivate(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn Surface) {
        self.pending.cancel(scheduler);
        if let Some(mut watch) = self.scroll_watch.take() {
            watch.close();
        }
        if self.field.take().is_some() {
            surface.clear();
            debug!(frames = self.frames, "particle field deactivated");
        }
    }

    /// Unmount: deactivate and stop watching the theme.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn Surface) {
        self.deactivate(scheduler, surface);
        self.theme_watch.close();
        self.mounted = false;
    }

    fn activate(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn Surface) {
        surface.resize(self.viewport);
        let field = ParticleField::new(&self.config, self.viewport, &mut self.rng);
        self.scroll_watch = Some(self.scroll.watch());
        self.set_translate(self.scroll.current(), surface);
        if self.reduced_motion {
            field.draw(surface, self.config.color_dark);
            self.frames += 1;
        } else {
            self.pending.request_frame(scheduler);
        }
        debug!(
            particles = field.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            "particle field activated"
        );
        self.field = Some(field);
    }

    fn apply_scroll(&mut self, surface: &mut dyn Surface) {
        let latest = self.scroll_watch.as_ref().and_then(Watch::take);
        if let Some(metrics) = latest {
            self.set_translate(metrics, surface);
        }
    }

    fn set_translate(&mut self, metrics: ScrollMetrics, surface: &mut dyn Surface) {
        let offset = metrics.progress() * self.config.max_offset;
        self.translate_y = offset;
        surface.set_translate_y(offset);
        trace!(offset, "particle surface translated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    #[derive(Default)]
    struct TestScheduler {
        next: u64,
        pending: BTreeSet<TaskHandle>,
    }

    impl Scheduler for TestScheduler {
        fn set_timeout(&mut self, _delay: Duration) -> TaskHandle {
            self.request_frame()
        }

        fn request_frame(&mut self) -> TaskHandle {
            self.next += 1;
            let handle = TaskHandle::from_raw(self.next);
            self.pending.insert(handle);
            handle
        }

        fn cancel(&mut self, handle: TaskHandle) -> bool {
            self.pending.remove(&handle)
        }

        fn pending_count(&self) -> usize {
            self.pending.len()
        }
    }

    impl TestScheduler {
        fn fire(&mut self) -> Option<TaskHandle> {
            let handle = *self.pending.iter().next()?;
            self.pending.remove(&handle);
            Some(handle)
        }
    }

    #[derive(Default)]
    struct CountingSurface {
        calls: usize,
        circles: usize,
        clears: usize,
        translate: Option<f64>,
        size: Option<Size>,
    }

    impl Surface for CountingSurface {
        fn resize(&mut self, size: Size) {
            self.calls += 1;
            self.size = Some(size);
        }

        fn clear(&mut self) {
            self.calls += 1;
            self.clears += 1;
        }

        fn fill_circle(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgba) {
            self.calls += 1;
            self.circles += 1;
        }

        fn set_translate_y(&mut self, offset: f64) {
            self.calls += 1;
            self.translate = Some(offset);
        }
    }

    const VIEWPORT: Size = Size::new(800.0, 600.0);

    fn simulator(theme: &ThemeSignal, scroll: &ScrollSignal) -> ParticleSimulator {
        ParticleSimulator::new(
            ParticleConfig::default(),
            theme,
            scroll,
            &FxPolicy::default(),
            0,
        )
    }

    #[test]
    fn field_has_population_within_ranges() {
        let config = ParticleConfig::default();
        let mut rng = SeededRandom::new(9);
        let field = ParticleField::new(&config, VIEWPORT, &mut rng);
        assert_eq!(field.len(), 50);
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((1.0..3.0).contains(&p.size));
            assert!((-0.25..0.25).contains(&p.vx));
            assert!((-0.25..0.25).contains(&p.vy));
        }
    }

    #[test]
    fn particle_bounces_off_each_edge() {
        let bounds = Size::new(10.0, 10.0);
        let mut p = Particle {
            x: 9.9,
            y: 0.1,
            size: 1.0,
            vx: 0.25,
            vy: -0.25,
        };
        p.step(bounds);
        assert!(p.x > 10.0);
        assert!(p.y < 0.0);
        assert_eq!(p.vx, -0.25);
        assert_eq!(p.vy, 0.25);
        p.step(bounds);
        assert!(p.x <= 10.0 && p.y >= 0.0);
    }

    #[test]
    fn particle_outside_heads_back_in() {
        let bounds = Size::new(320.0, 480.0);
        let mut p = Particle {
            x: 700.0,
            y: 100.0,
            size: 1.0,
            vx: 0.2,
            vy: 0.0,
        };
        p.step(bounds);
        assert_eq!(p.vx, -0.2);
        for _ in 0..10_000 {
            p.step(bounds);
        }
        assert!(p.x >= -0.2 && p.x <= 320.2, "x = {}", p.x);
    }

    #[test]
    fn shrinking_field_keeps_particles_in_bounds() {
        let config = ParticleConfig::default();
        let mut field = ParticleField::new(&config, VIEWPORT, &mut SeededRandom::new(9));
        let small = Size::new(320.0, 480.0);
        field.resize(small);
        assert!(field.particles().iter().all(|p| {
            (0.0..=small.width).contains(&p.x) && (0.0..=small.height).contains(&p.y)
        }));
        for _ in 0..2_000 {
            field.step();
            for p in field.particles() {
                assert!(p.x >= -p.vx.abs() && p.x <= small.width + p.vx.abs());
                assert!(p.y >= -p.vy.abs() && p.y <= small.height + p.vy.abs());
            }
        }
        assert_eq!(field.len(), config.population);
    }

    #[test]
    fn inactive_in_light_theme() {
        let theme = ThemeSignal::new(Theme::Light);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        assert!(!sim.is_active());
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(surface.calls, 0);
    }

    #[test]
    fn dark_theme_activates_and_draws_each_frame() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        assert!(sim.is_active());
        assert_eq!(surface.size, Some(VIEWPORT));
        assert_eq!(sched.pending_count(), 1);

        for _ in 0..3 {
            let h = sched.fire().unwrap_or(TaskHandle::from_raw(0));
            assert!(sim.on_frame(h, &mut sched, &mut surface));
        }
        assert_eq!(sim.frames_drawn(), 3);
        assert_eq!(surface.clears, 3);
        assert_eq!(surface.circles, 150);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn switch_to_light_tears_down_before_drawing() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);

        theme.set(Theme::Light);
        let h = sched.fire().unwrap_or(TaskHandle::from_raw(0));
        let circles = surface.circles;
        assert!(sim.on_frame(h, &mut sched, &mut surface));
        assert_eq!(surface.circles, circles);
        assert!(!sim.is_active());
        assert_eq!(sched.pending_count(), 0);

        let calls = surface.calls;
        assert!(!sim.on_frame(h, &mut sched, &mut surface));
        sim.sync(&mut sched, &mut surface);
        assert_eq!(surface.calls, calls);
    }

    #[test]
    fn sync_deactivates_and_stale_frame_is_ignored() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        let stale = sim.pending_frame().unwrap_or(TaskHandle::from_raw(0));

        theme.set(Theme::Light);
        assert!(sim.needs_sync());
        sim.sync(&mut sched, &mut surface);
        assert!(!sim.is_active());
        assert_eq!(sched.pending_count(), 0);

        let calls = surface.calls;
        assert!(!sim.on_frame(stale, &mut sched, &mut surface));
        assert_eq!(surface.calls, calls);
    }

    #[test]
    fn reactivation_builds_fresh_field() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        let first = sim.field().map(|f| f.particles()[0]);

        theme.toggle();
        sim.sync(&mut sched, &mut surface);
        theme.toggle();
        sim.sync(&mut sched, &mut surface);
        assert!(sim.is_active());
        assert_ne!(sim.field().map(|f| f.particles()[0]), first);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn scroll_progress_drives_translation() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::new(ScrollMetrics::new(0.0, 600.0, 2600.0));
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        assert_eq!(surface.translate, Some(0.0));

        scroll.scroll_to(500.0);
        sim.sync(&mut sched, &mut surface);
        assert_eq!(sim.translate_y(), 25.0);
        assert_eq!(surface.translate, Some(25.0));

        scroll.scroll_to(5000.0);
        sim.sync(&mut sched, &mut surface);
        assert_eq!(sim.translate_y(), 100.0);
    }

    #[test]
    fn scroll_is_unbound_while_inactive() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::new(ScrollMetrics::new(0.0, 600.0, 2600.0));
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        theme.set(Theme::Light);
        sim.sync(&mut sched, &mut surface);

        let calls = surface.calls;
        scroll.scroll_to(1000.0);
        assert!(!sim.needs_sync());
        sim.sync(&mut sched, &mut surface);
        assert_eq!(surface.calls, calls);
    }

    #[test]
    fn reduced_motion_draws_once() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let policy = FxPolicy {
            reduced_motion: true,
            ..FxPolicy::default()
        };
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = ParticleSimulator::new(ParticleConfig::default(), &theme, &scroll, &policy, 0);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        assert!(sim.is_active());
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(surface.circles, 50);
    }

    #[test]
    fn disabled_policy_never_activates() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let policy = FxPolicy {
            particles: false,
            ..FxPolicy::default()
        };
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = ParticleSimulator::new(ParticleConfig::default(), &theme, &scroll, &policy, 0);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        assert!(!sim.is_active());
        assert_eq!(surface.calls, 0);
    }

    #[test]
    fn teardown_is_idempotent() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        sim.teardown(&mut sched, &mut surface);
        sim.teardown(&mut sched, &mut surface);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(surface.clears, 1);
        theme.set(Theme::Light);
        theme.set(Theme::Dark);
        sim.sync(&mut sched, &mut surface);
        assert!(!sim.is_active());
    }

    #[test]
    fn resize_rebounds_active_field() {
        let theme = ThemeSignal::new(Theme::Dark);
        let scroll = ScrollSignal::default();
        let mut sched = TestScheduler::default();
        let mut surface = CountingSurface::default();
        let mut sim = simulator(&theme, &scroll);
        sim.mount(VIEWPORT, &mut sched, &mut surface);
        let small = Size::new(320.0, 480.0);
        sim.resize(small, &mut surface);
        assert_eq!(surface.size, Some(small));
        assert_eq!(sim.field().map(ParticleField::bounds), Some(small));
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        assert!(ParticleConfig::default().validate().is_ok());
        assert_eq!(
            ParticleConfig::default().population(0).validate(),
            Err(ConfigError::EmptyPopulation)
        );
        assert!(ParticleConfig::default().size_range(3.0, 1.0).validate().is_err());
        assert!(
            ParticleConfig::default()
                .velocity_range(f64::NAN, 0.0)
                .validate()
                .is_err()
        );
    }
}
