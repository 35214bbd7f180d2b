#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};
use std::time::Duration;

use folio_core::event::ElementEvent;
use folio_core::geometry::Size;
use folio_core::measure::{ElementId, Measure};
use folio_core::random::SeededRandom;
use folio_core::reactive::{Observable, Subscription};
use folio_core::schedule::{PendingTask, TaskHandle};
use folio_core::signal::{ScrollSignal, Theme, ThemeSignal};
use folio_fx::policy::ENV_REDUCED_MOTION;
use folio_fx::{
    FocusMode, FocusTracker, FxPolicy, ParticleSimulator, ScrambleReveal, ScrollBehavior,
    ScrollThresholdToggle, TriggerMode,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, ScrollToOptions, Window};
use web_time::Instant;

use crate::dom::{
    BrowserScheduler, CanvasSurface, DomMeasure, Driven, Listener, prefers_reduced_motion,
    set_styles, viewport_size, window_scroll_metrics,
};
use crate::options::{focus_options, particle_options, scramble_options, threshold_options};

thread_local! {
    static NEXT_INSTANCE: Cell<u32> = const { Cell::new(0) };
}

/// Fresh instance number, used to give each engine its own random stream.
fn next_instance() -> u32 {
    NEXT_INSTANCE.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    })
}

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window.document().ok_or_else(|| js_error("window has no document"))
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

/// Run `f` on the host if it is still alive and not already borrowed.
///
/// A busy host means the callback re-entered from inside its own update;
/// the nested call is dropped.
fn with_host<T>(weak: &Weak<RefCell<T>>, f: impl FnOnce(&mut T)) {
    if let Some(host) = weak.upgrade()
        && let Ok(mut guard) = host.try_borrow_mut()
    {
        f(&mut guard);
    }
}

fn forward<T: 'static>(
    host: &Rc<RefCell<T>>,
    target: &web_sys::EventTarget,
    kind: &'static str,
    mut f: impl FnMut(&mut T) + 'static,
) -> Result<Listener, JsValue> {
    let weak = Rc::downgrade(host);
    Listener::new(target, kind, move |_event| with_host(&weak, &mut f))
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

struct SignalsInner {
    window: Window,
    theme: ThemeSignal,
    scroll: ScrollSignal,
    viewport: Observable<Size>,
    policy: FxPolicy,
}

impl SignalsInner {
    fn refresh(&self) {
        if let Some(metrics) = window_scroll_metrics(&self.window) {
            self.scroll.set(metrics);
        }
        if let Some(size) = viewport_size(&self.window) {
            self.viewport.set(size);
        }
    }
}

/// Page-wide theme and scroll state shared by every effect.
///
/// Create one per page and pass it to each effect constructor. The theme is
/// mirrored as a `dark` class on the document element.
#[wasm_bindgen]
pub struct FolioSignals {
    inner: Rc<SignalsInner>,
    listeners: Vec<Listener>,
    theme_class: Option<Subscription>,
}

#[wasm_bindgen]
impl FolioSignals {
    /// `theme` is `"light"` or `"dark"`; anything else means light.
    #[wasm_bindgen(constructor)]
    pub fn new(theme: Option<String>) -> Result<FolioSignals, JsValue> {
        let window = window()?;
        let theme = theme.as_deref().and_then(Theme::parse).unwrap_or_default();
        let reduced = prefers_reduced_motion(&window);
        let policy = FxPolicy::from_env_with(|key| {
            (key == ENV_REDUCED_MOTION && reduced).then(|| "1".to_owned())
        });
        let inner = Rc::new(SignalsInner {
            theme: ThemeSignal::new(theme),
            scroll: ScrollSignal::new(window_scroll_metrics(&window).unwrap_or_default()),
            viewport: Observable::new(viewport_size(&window).unwrap_or_default()),
            policy,
            window,
        });

        let mut listeners = Vec::with_capacity(2);
        for kind in ["scroll", "resize"] {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::new(&inner.window, kind, move |_event| {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            })?);
        }

        let root = document(&inner.window)?.document_element();
        let apply_class = move |theme: Theme| {
            if let Some(root) = &root {
                let _ = root.class_list().toggle_with_force("dark", theme.is_dark());
            }
        };
        apply_class(theme);
        let theme_class = inner.theme.subscribe(apply_class);

        Ok(Self {
            inner,
            listeners,
            theme_class: Some(theme_class),
        })
    }

    pub fn theme(&self) -> String {
        self.inner.theme.current().as_str().to_owned()
    }

    /// Returns `true` if the theme changed.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, name: &str) -> Result<bool, JsValue> {
        let theme = Theme::parse(name).ok_or_else(|| js_error(format!("unknown theme {name:?}")))?;
        Ok(self.inner.theme.set(theme))
    }

    /// Flip the theme and return the new one.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> String {
        self.inner.theme.toggle().as_str().to_owned()
    }

    #[wasm_bindgen(js_name = reducedMotion)]
    pub fn reduced_motion(&self) -> bool {
        self.inner.policy.reduced_motion
    }

    /// Re-read scroll position and viewport size (e.g. after content loads).
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    /// Stop listening to the window. Effects already built keep their state.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.theme_class = None;
    }
}

// ---------------------------------------------------------------------------
// Scramble
// ---------------------------------------------------------------------------

const SELF_ID: ElementId = ElementId::root(0);

struct ScrambleHost {
    scheduler: BrowserScheduler,
    reveal: ScrambleReveal,
    glyphs: SeededRandom,
    measure: DomMeasure,
    element: HtmlElement,
}

impl ScrambleHost {
    fn paint(&self) {
        self.element.set_text_content(Some(self.reveal.displayed()));
    }

    fn handle(&mut self, event: ElementEvent) {
        let Self {
            scheduler,
            reveal,
            glyphs,
            ..
        } = &mut *self;
        reveal.handle_event(event, scheduler, glyphs);
        self.paint();
    }

    fn check_visibility(&mut self) {
        if self.reveal.config().trigger == TriggerMode::View
            && self.measure.is_visible(SELF_ID) == Some(true)
        {
            self.handle(ElementEvent::Visibility(true));
        }
    }
}

impl Driven for ScrambleHost {
    fn scheduler(&mut self) -> &mut BrowserScheduler {
        &mut self.scheduler
    }

    fn on_task(&mut self, handle: TaskHandle) {
        if self
            .reveal
            .on_timer(handle, &mut self.scheduler, &mut self.glyphs)
        {
            self.paint();
        }
    }
}

/// Scramble-reveal bound to an element's text.
#[wasm_bindgen]
pub struct ScrambleText {
    host: Rc<RefCell<ScrambleHost>>,
    listeners: Vec<Listener>,
    visibility: Option<Subscription>,
}

#[wasm_bindgen]
impl ScrambleText {
    /// `options` is a JSON object; every field is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: HtmlElement,
        signals: &FolioSignals,
        options: Option<String>,
    ) -> Result<ScrambleText, JsValue> {
        let config = scramble_options(options.as_deref()).map_err(js_error)?;
        let trigger = config.trigger;
        let signals = &signals.inner;
        let text = element.text_content().unwrap_or_default();
        let mut measure = DomMeasure::new(signals.window.clone());
        measure.register(SELF_ID, element.clone().into());
        let reveal = ScrambleReveal::new(text, config).reduced_motion(signals.policy.reduced_motion);
        let glyphs = SeededRandom::new(signals.policy.seed_for(next_instance()));

        let host = Rc::new_cyclic(|weak: &Weak<RefCell<ScrambleHost>>| {
            RefCell::new(ScrambleHost {
                scheduler: BrowserScheduler::new(signals.window.clone(), weak.clone()),
                reveal,
                glyphs,
                measure,
                element: element.clone(),
            })
        });

        let mut listeners = Vec::new();
        let mut visibility = None;
        match trigger {
            TriggerMode::Hover => listeners.push(forward(&host, &element, "mouseenter", |h| {
                h.handle(ElementEvent::PointerEnter);
            })?),
            TriggerMode::Click => listeners.push(forward(&host, &element, "click", |h| {
                h.handle(ElementEvent::Click);
            })?),
            TriggerMode::View => {
                let weak = Rc::downgrade(&host);
                visibility = Some(signals.scroll.subscribe(move |_| {
                    with_host(&weak, ScrambleHost::check_visibility);
                }));
                host.borrow_mut().check_visibility();
            }
        }

        Ok(Self {
            host,
            listeners,
            visibility,
        })
    }

    /// Start a run now, whatever the trigger mode.
    pub fn start(&self) {
        with_host(&Rc::downgrade(&self.host), |h| {
            let ScrambleHost {
                scheduler,
                reveal,
                glyphs,
                ..
            } = &mut *h;
            reveal.start(scheduler, glyphs);
            h.paint();
        });
    }

    /// Replace the target text, cancelling any run in progress.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: &str) {
        with_host(&Rc::downgrade(&self.host), |h| {
            h.reveal.retarget(text, &mut h.scheduler);
            h.paint();
        });
    }

    /// Currently displayed text.
    pub fn text(&self) -> String {
        self.host.borrow().reveal.displayed().to_owned()
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.host.borrow().reveal.is_animating()
    }

    /// Detach listeners, cancel the pending step and show the target text.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.visibility = None;
        with_host(&Rc::downgrade(&self.host), |h| {
            h.reveal.teardown(&mut h.scheduler);
            h.measure.clear();
            h.paint();
        });
    }
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

struct FocusHost {
    scheduler: BrowserScheduler,
    tracker: FocusTracker,
    measure: DomMeasure,
    words: Vec<HtmlElement>,
    overlay: HtmlElement,
    reduced_motion: bool,
    tween: PendingTask,
    last_frame: Option<Instant>,
}

impl FocusHost {
    fn paint(&mut self) {
        let config = self.tracker.config();
        let transition = if self.reduced_motion {
            "none".to_owned()
        } else {
            format!("filter {}s ease", config.animation_duration)
        };
        for (index, word) in self.words.iter().enumerate() {
            let blur = if self.tracker.is_word_blurred(index) {
                config.blur_amount
            } else {
                0.0
            };
            let filter = format!("blur({blur}px)");
            set_styles(
                word,
                &[("filter", filter.as_str()), ("transition", transition.as_str())],
            );
        }

        match self.tracker.overlay_rect() {
            Some(rect) => {
                let [left, top, width, height] =
                    [rect.x, rect.y, rect.width, rect.height].map(|px| format!("{px}px"));
                set_styles(
                    &self.overlay,
                    &[
                        ("left", left.as_str()),
                        ("top", top.as_str()),
                        ("width", width.as_str()),
                        ("height", height.as_str()),
                        ("opacity", "1"),
                    ],
                );
            }
            None => set_styles(&self.overlay, &[("opacity", "0")]),
        }

        if !self.tracker.overlay().is_settled() && !self.tween.is_pending() {
            self.last_frame = Some(Instant::now());
            self.tween.request_frame(&mut self.scheduler);
        }
    }

    fn clear_styles(&self) {
        for word in &self.words {
            set_styles(word, &[("filter", "none")]);
        }
        self.overlay.remove();
    }
}

impl Driven for FocusHost {
    fn scheduler(&mut self) -> &mut BrowserScheduler {
        &mut self.scheduler
    }

    fn on_task(&mut self, handle: TaskHandle) {
        if self
            .tracker
            .on_timer(handle, &mut self.scheduler, &self.measure)
        {
            self.paint();
        } else if self.tween.fire(handle) {
            let now = Instant::now();
            let dt = self
                .last_frame
                .map_or(Duration::ZERO, |last| now.duration_since(last));
            self.last_frame = Some(now);
            self.tracker.advance(dt);
            self.paint();
        }
    }
}

/// Focus tracker over the words of a container element.
///
/// The container's text is replaced by one `<span>` per word plus an
/// absolutely positioned highlight box.
#[wasm_bindgen]
pub struct FocusText {
    host: Rc<RefCell<FocusHost>>,
    listeners: Vec<Listener>,
    relayout: Option<Subscription>,
}

#[wasm_bindgen]
impl FocusText {
    /// `options` is a JSON object; `sentence` defaults to the container text.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        signals: &FolioSignals,
        options: Option<String>,
    ) -> Result<FocusText, JsValue> {
        let text = container.text_content().unwrap_or_default();
        let config = focus_options(options.as_deref(), &text).map_err(js_error)?;
        let signals = &signals.inner;
        let document = document(&signals.window)?;

        let overlay_style = [
            ("position", "absolute".to_owned()),
            ("pointer-events", "none".to_owned()),
            ("box-sizing", "border-box".to_owned()),
            ("border", format!("2px solid {}", config.border_color.to_css())),
            ("border-radius", "4px".to_owned()),
            ("box-shadow", format!("0 0 12px {}", config.glow_color.to_css())),
            ("opacity", "0".to_owned()),
        ];
        let tracker = FocusTracker::new(config, SELF_ID).reduced_motion(signals.policy.reduced_motion);

        container.set_text_content(None);
        set_styles(
            &container,
            &[
                ("position", "relative"),
                ("display", "flex"),
                ("flex-wrap", "wrap"),
                ("gap", "0.5em"),
            ],
        );
        let mut measure = DomMeasure::new(signals.window.clone());
        measure.register(SELF_ID, container.clone().into());
        let mut words = Vec::with_capacity(tracker.words().len());
        for (index, word) in tracker.words().iter().enumerate() {
            let span = create_html(&document, "span")?;
            span.set_text_content(Some(word));
            container.append_child(&span)?;
            measure.register(tracker.word_element(index), span.clone().into());
            words.push(span);
        }
        let overlay = create_html(&document, "div")?;
        let overlay_style: Vec<(&str, &str)> = overlay_style
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        set_styles(&overlay, &overlay_style);
        container.append_child(&overlay)?;

        let host = Rc::new_cyclic(|weak: &Weak<RefCell<FocusHost>>| {
            RefCell::new(FocusHost {
                scheduler: BrowserScheduler::new(signals.window.clone(), weak.clone()),
                tracker,
                measure,
                words: words.clone(),
                overlay,
                reduced_motion: signals.policy.reduced_motion,
                tween: PendingTask::new(),
                last_frame: None,
            })
        });
        {
            let mut h = host.borrow_mut();
            let FocusHost {
                scheduler,
                tracker,
                measure,
                ..
            } = &mut *h;
            tracker.mount(scheduler, measure);
            h.paint();
        }

        let mut listeners = Vec::with_capacity(words.len() * 2);
        for (index, word) in words.iter().enumerate() {
            listeners.push(forward(&host, word, "mouseenter", move |h| {
                if h.tracker.pointer_enter(index, &h.measure) {
                    h.paint();
                }
            })?);
            listeners.push(forward(&host, word, "mouseleave", |h| {
                if h.tracker.pointer_leave(&h.measure) {
                    h.paint();
                }
            })?);
        }
        let weak = Rc::downgrade(&host);
        let relayout = signals.viewport.subscribe(move |_| {
            with_host(&weak, |h| {
                if h.tracker.layout_changed(&h.measure) {
                    h.paint();
                }
            });
        });

        Ok(Self {
            host,
            listeners,
            relayout: Some(relayout),
        })
    }

    /// Switch between pointer-driven and automatic cycling.
    #[wasm_bindgen(js_name = setManual)]
    pub fn set_manual(&self, manual: bool) {
        let mode = if manual {
            FocusMode::Manual
        } else {
            FocusMode::Automatic
        };
        with_host(&Rc::downgrade(&self.host), |h| {
            h.tracker.set_mode(mode, &mut h.scheduler);
            h.paint();
        });
    }

    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> usize {
        self.host.borrow().tracker.active_index()
    }

    /// Re-measure after a layout change the window did not report.
    #[wasm_bindgen(js_name = layoutChanged)]
    pub fn layout_changed(&self) {
        with_host(&Rc::downgrade(&self.host), |h| {
            if h.tracker.layout_changed(&h.measure) {
                h.paint();
            }
        });
    }

    /// Stop cycling, unblur the words and remove the highlight box.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.relayout = None;
        with_host(&Rc::downgrade(&self.host), |h| {
            h.tracker.teardown(&mut h.scheduler);
            h.tween.cancel(&mut h.scheduler);
            h.measure.clear();
            h.clear_styles();
        });
    }
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

struct ParticleHost {
    scheduler: BrowserScheduler,
    simulator: ParticleSimulator,
    surface: CanvasSurface,
}

impl ParticleHost {
    fn sync(&mut self) {
        self.simulator.sync(&mut self.scheduler, &mut self.surface);
    }
}

impl Driven for ParticleHost {
    fn scheduler(&mut self) -> &mut BrowserScheduler {
        &mut self.scheduler
    }

    fn on_task(&mut self, handle: TaskHandle) {
        self.simulator
            .on_frame(handle, &mut self.scheduler, &mut self.surface);
    }
}

/// Dark-theme particle backdrop drawn into a fixed, full-viewport canvas.
#[wasm_bindgen]
pub struct ParticleBackdrop {
    host: Rc<RefCell<ParticleHost>>,
    subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl ParticleBackdrop {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        signals: &FolioSignals,
        options: Option<String>,
    ) -> Result<ParticleBackdrop, JsValue> {
        let config = particle_options(options.as_deref()).map_err(js_error)?;
        let signals = &signals.inner;
        set_styles(
            &canvas,
            &[
                ("position", "fixed"),
                ("inset", "0"),
                ("pointer-events", "none"),
                ("z-index", "-1"),
            ],
        );
        let surface = CanvasSurface::new(canvas)?;
        let simulator = ParticleSimulator::new(
            config,
            &signals.theme,
            &signals.scroll,
            &signals.policy,
            next_instance(),
        );

        let host = Rc::new_cyclic(|weak: &Weak<RefCell<ParticleHost>>| {
            RefCell::new(ParticleHost {
                scheduler: BrowserScheduler::new(signals.window.clone(), weak.clone()),
                simulator,
                surface,
            })
        });
        {
            let mut h = host.borrow_mut();
            let ParticleHost {
                scheduler,
                simulator,
                surface,
            } = &mut *h;
            simulator.mount(signals.viewport.get(), scheduler, surface);
        }

        let theme = {
            let weak = Rc::downgrade(&host);
            signals
                .theme
                .subscribe(move |_| with_host(&weak, ParticleHost::sync))
        };
        let scroll = {
            let weak = Rc::downgrade(&host);
            signals
                .scroll
                .subscribe(move |_| with_host(&weak, ParticleHost::sync))
        };
        let resize = {
            let weak = Rc::downgrade(&host);
            signals.viewport.subscribe(move |size| {
                let size = *size;
                with_host(&weak, |h| h.simulator.resize(size, &mut h.surface));
            })
        };

        Ok(Self {
            host,
            subscriptions: vec![theme, scroll, resize],
        })
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.host.borrow().simulator.is_active()
    }

    #[wasm_bindgen(js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> f64 {
        self.host.borrow().simulator.frames_drawn() as f64
    }

    /// Stop the animation loop and clear the canvas.
    pub fn destroy(&mut self) {
        self.subscriptions.clear();
        with_host(&Rc::downgrade(&self.host), |h| {
            h.simulator.teardown(&mut h.scheduler, &mut h.surface);
        });
    }
}

// ---------------------------------------------------------------------------
// Scroll toggle
// ---------------------------------------------------------------------------

/// Boolean that flips when the page scrolls past a threshold.
#[wasm_bindgen]
pub struct ScrollToggle {
    window: Window,
    reduced_motion: bool,
    toggle: Rc<RefCell<ScrollThresholdToggle>>,
    notify: Option<Subscription>,
}

#[wasm_bindgen]
impl ScrollToggle {
    /// `threshold` defaults to 500px. `on_change` receives the new
    /// visibility whenever it flips.
    #[wasm_bindgen(constructor)]
    pub fn new(
        signals: &FolioSignals,
        threshold: Option<f64>,
        on_change: Option<js_sys::Function>,
    ) -> Result<ScrollToggle, JsValue> {
        let config = threshold_options(threshold).map_err(js_error)?;
        let signals = &signals.inner;
        let mut toggle = ScrollThresholdToggle::new(config);
        toggle.mount(&signals.scroll);
        let toggle = Rc::new(RefCell::new(toggle));

        let notify = on_change.map(|callback| {
            let toggle = Rc::clone(&toggle);
            let last = Cell::new(toggle.borrow().is_visible());
            signals.scroll.subscribe(move |metrics| {
                let toggle = toggle.borrow();
                toggle.update(metrics.offset_y);
                let visible = toggle.is_visible();
                if visible != last.replace(visible) {
                    let _ = callback.call1(&JsValue::NULL, &JsValue::from_bool(visible));
                }
            })
        });

        Ok(Self {
            window: signals.window.clone(),
            reduced_motion: signals.policy.reduced_motion,
            toggle,
            notify,
        })
    }

    pub fn visible(&self) -> bool {
        self.toggle.borrow().is_visible()
    }

    pub fn threshold(&self) -> f64 {
        self.toggle.borrow().threshold()
    }

    /// Scroll the window back to the top, smoothly unless reduced motion
    /// is preferred.
    #[wasm_bindgen(js_name = scrollToTop)]
    pub fn scroll_to_top(&self) {
        let request = self.toggle.borrow().scroll_to_top();
        let behavior = match request.behavior {
            ScrollBehavior::Smooth if !self.reduced_motion => web_sys::ScrollBehavior::Smooth,
            _ => web_sys::ScrollBehavior::Instant,
        };
        let options = ScrollToOptions::new();
        options.set_top(request.top);
        options.set_behavior(behavior);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    pub fn destroy(&mut self) {
        self.notify = None;
        if let Ok(mut toggle) = self.toggle.try_borrow_mut() {
            toggle.unmount();
        }
    }
}
