//! Browser integration
//!
//! Draws on a 2D canvas using its native composite operations and wires the
//! session to `click`, `resize` and `requestAnimationFrame`. Every listener
//! and the pending frame request are handed to the session, so stopping it
//! unhooks everything.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent};

use crate::renderer::{BlendMode, Hsla, Rect, Stroke, Surface};
use crate::session::{Session, SessionError, Subscription};
use crate::settings::Settings;

type SharedSession = Rc<RefCell<Session<CanvasSurface>>>;

/// [`Surface`] over a canvas' 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SessionError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| SessionError::SurfaceUnavailable("no 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Look up `<canvas id=...>` in the current document
    pub fn from_element_id(id: &str) -> Result<Self, SessionError> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| SessionError::SurfaceUnavailable(format!("no element #{}", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SessionError::SurfaceUnavailable(format!("#{} is not a canvas", id)))?;
        Self::new(canvas)
    }

    fn set_blend(&self, blend: BlendMode) {
        if let Err(e) = self.ctx.set_global_composite_operation(blend.as_str()) {
            log::warn!("Composite operation {} rejected: {:?}", blend.as_str(), e);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Hsla, blend: BlendMode) {
        self.set_blend(blend);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke, blend: BlendMode) {
        self.set_blend(blend);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.stroke();
    }
}

/// An event listener, removed on cancel
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            closure,
        })
    }
}

impl Subscription for Listener {
    fn cancel(self: Box<Self>) {
        match self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            Ok(()) => log::debug!("Removed {} listener", self.event),
            Err(e) => log::warn!("Removing {} listener failed: {:?}", self.event, e),
        }
    }
}

/// The outstanding `requestAnimationFrame` id
struct FrameRequest {
    pending: Rc<Cell<Option<i32>>>,
}

impl Subscription for FrameRequest {
    fn cancel(self: Box<Self>) {
        if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
            if let Err(e) = window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame({}) failed: {:?}", id, e);
            }
        }
    }
}

fn request_animation_frame(session: SharedSession, pending: Rc<Cell<Option<i32>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let next = pending.clone();
    let closure = Closure::once(move |_time: f64| {
        next.set(None);
        let running = {
            let mut s = session.borrow_mut();
            s.frame();
            s.is_running()
        };
        if running {
            request_animation_frame(session, next);
        }
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => pending.set(Some(id)),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as u32, h as u32)
}

fn to_js(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle returned to the page
#[wasm_bindgen]
pub struct FireworksHandle {
    session: SharedSession,
}

#[wasm_bindgen]
impl FireworksHandle {
    /// Stop the show and unhook every listener; safe to call repeatedly
    pub fn stop(&self) {
        self.session.borrow_mut().stop();
    }

    /// Launch toward a point in canvas coordinates
    pub fn pointer(&self, x: f32, y: f32) -> bool {
        self.session.borrow_mut().forward_pointer_event(x, y)
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.session.borrow().is_running()
    }

    /// Persist the current settings for the next show
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&self) {
        self.session.borrow().settings().save();
    }
}

/// Start fireworks on `<canvas id=canvas_id>`, sized to the viewport
#[wasm_bindgen(js_name = startFireworks)]
pub fn start_fireworks(canvas_id: &str) -> Result<FireworksHandle, JsValue> {
    console_error_panic_hook::set_once();
    // Already initialized on a second show
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut surface = CanvasSurface::from_element_id(canvas_id).map_err(to_js)?;
    let (width, height) = viewport_size(&window);
    surface.resize(width, height);
    let canvas = surface.canvas.clone();

    let seed = js_sys::Date::now() as u64;
    let session: SharedSession = Rc::new(RefCell::new(Session::new(Settings::load(), seed)));
    session.borrow_mut().start(surface).map_err(to_js)?;

    let click = {
        let session = session.clone();
        Listener::add(canvas.into(), "click", move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                session
                    .borrow_mut()
                    .forward_pointer_event(mouse.offset_x() as f32, mouse.offset_y() as f32);
            }
        })?
    };

    let resize = {
        let session = session.clone();
        let win = window.clone();
        Listener::add(window.clone().into(), "resize", move |_event: Event| {
            let (w, h) = viewport_size(&win);
            session.borrow_mut().resize(w, h);
        })?
    };

    let pending = Rc::new(Cell::new(None));
    {
        let mut s = session.borrow_mut();
        s.attach(Box::new(click));
        s.attach(Box::new(resize));
        s.attach(Box::new(FrameRequest {
            pending: pending.clone(),
        }));
    }
    request_animation_frame(session.clone(), pending);

    log::info!("Fireworks started on #{} (seed {})", canvas_id, seed);
    Ok(FireworksHandle { session })
}
