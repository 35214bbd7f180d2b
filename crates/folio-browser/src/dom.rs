#![forbid(unsafe_code)]

//! Browser implementations of the engine capabilities.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Weak;
use std::time::Duration;

use folio_core::geometry::{Rect, Size};
use folio_core::measure::{ElementId, Measure};
use folio_core::schedule::{Scheduler, TaskHandle};
use folio_core::signal::ScrollMetrics;
use folio_core::warn;
use folio_fx::surface::{Rgba, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, Window,
};

use crate::registry::TaskRegistry;

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Something that owns a [`BrowserScheduler`] and consumes its handles.
pub(crate) trait Driven: 'static {
    fn scheduler(&mut self) -> &mut BrowserScheduler;

    /// A timeout or frame handle fired.
    fn on_task(&mut self, handle: TaskHandle);
}

/// [`Scheduler`] backed by `setTimeout` and `requestAnimationFrame`.
///
/// Two closures are created per scheduler and reused for every request; the
/// timeout closure receives the handle as its argument. Dropping the
/// scheduler clears every outstanding browser registration, so no callback
/// reaches a freed closure.
pub(crate) struct BrowserScheduler {
    window: Window,
    registry: TaskRegistry,
    frame_id: Option<i32>,
    on_timeout: Closure<dyn FnMut(JsValue)>,
    on_frame: Closure<dyn FnMut(f64)>,
}

impl BrowserScheduler {
    /// Scheduler whose firings are routed to `owner`.
    pub(crate) fn new<T: Driven>(window: Window, owner: Weak<RefCell<T>>) -> Self {
        let timeout_owner = owner.clone();
        let on_timeout = Closure::new(move |arg: JsValue| {
            let Some(raw) = arg.as_f64() else {
                return;
            };
            let handle = TaskHandle::from_raw(raw as u64);
            let Some(owner) = timeout_owner.upgrade() else {
                return;
            };
            let Ok(mut owner) = owner.try_borrow_mut() else {
                warn!(handle = handle.raw(), "timeout fired while owner was busy");
                return;
            };
            if owner.scheduler().registry.complete_timeout(handle) {
                owner.on_task(handle);
            }
        });
        let on_frame = Closure::new(move |_timestamp: f64| {
            let Some(owner) = owner.upgrade() else {
                return;
            };
            let Ok(mut owner) = owner.try_borrow_mut() else {
                return;
            };
            let frames = {
                let scheduler = owner.scheduler();
                scheduler.frame_id = None;
                scheduler.registry.take_frames()
            };
            for handle in frames {
                owner.on_task(handle);
            }
        });
        Self {
            window,
            registry: TaskRegistry::new(),
            frame_id: None,
            on_timeout,
            on_frame,
        }
    }

    fn register_frame(&mut self) {
        if self.frame_id.is_some() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(id) => self.frame_id = Some(id),
            Err(_) => {
                warn!("requestAnimationFrame failed");
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&mut self, delay: Duration) -> TaskHandle {
        let handle = self.registry.allocate();
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let result = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.on_timeout.as_ref().unchecked_ref(),
                ms,
                &JsValue::from_f64(handle.raw() as f64),
            );
        match result {
            Ok(id) => self.registry.insert_timeout(handle, id),
            Err(_) => {
                warn!(handle = handle.raw(), "setTimeout failed");
            }
        }
        handle
    }

    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.registry.allocate();
        if self.registry.push_frame(handle) {
            self.register_frame();
        }
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        if let Some(id) = self.registry.remove_timeout(handle) {
            self.window.clear_timeout_with_handle(id);
            return true;
        }
        if !self.registry.remove_frame(handle) {
            return false;
        }
        if !self.registry.has_frames()
            && let Some(id) = self.frame_id.take()
        {
            let _ = self.window.cancel_animation_frame(id);
        }
        true
    }

    fn pending_count(&self) -> usize {
        self.registry.len()
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        for id in self.registry.drain_timeouts() {
            self.window.clear_timeout_with_handle(id);
        }
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// [`Measure`] over registered DOM elements via `getBoundingClientRect`.
pub(crate) struct DomMeasure {
    window: Window,
    elements: BTreeMap<ElementId, Element>,
}

impl DomMeasure {
    pub(crate) fn new(window: Window) -> Self {
        Self {
            window,
            elements: BTreeMap::new(),
        }
    }

    pub(crate) fn register(&mut self, id: ElementId, element: Element) {
        self.elements.insert(id, element);
    }

    pub(crate) fn clear(&mut self) {
        self.elements.clear();
    }
}

impl Measure for DomMeasure {
    fn measure(&self, element: ElementId) -> Option<Rect> {
        let node = self.elements.get(&element)?;
        if !node.is_connected() {
            return None;
        }
        let rect = node.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn viewport(&self) -> Option<Rect> {
        viewport_size(&self.window).map(Rect::from_size)
    }
}

/// Inner size of the window.
pub(crate) fn viewport_size(window: &Window) -> Option<Size> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Size::new(width, height))
}

/// Current document scroll state.
pub(crate) fn window_scroll_metrics(window: &Window) -> Option<ScrollMetrics> {
    let offset_y = window.scroll_y().ok()?;
    let viewport_height = window.inner_height().ok()?.as_f64()?;
    let document_height = window
        .document()?
        .document_element()
        .map_or(viewport_height, |root| f64::from(root.scroll_height()));
    Some(ScrollMetrics::new(offset_y, viewport_height, document_height))
}

/// `prefers-reduced-motion: reduce`.
pub(crate) fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// [`Surface`] drawing into a 2D canvas context.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, size: Size) {
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.context.begin_path();
        if self
            .context
            .arc(x, y, radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.context.set_fill_style_str(&color.to_css());
            self.context.fill();
        }
    }

    fn set_translate_y(&mut self, offset: f64) {
        let _ = self
            .canvas
            .style()
            .set_property("transform", &format!("translateY({offset}px)"));
    }
}

/// Set a batch of inline style properties, ignoring rejected ones.
pub(crate) fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in styles {
        let _ = style.set_property(name, value);
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A DOM event listener that is removed when dropped.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}
