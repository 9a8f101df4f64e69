//! Browser render loop.
//!
//! Owns the canvas, the DOM listeners and the requestAnimationFrame chain
//! for one mounted scene. Listeners only write into `HostState`; the frame
//! callback snapshots it once per tick and drives the scene from that.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement,
    PointerEvent, Window,
};

use super::scene::{FrameInput, Scene, Viewport};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::render::CanvasSurface;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Inline style for a canvas the engine creates inside a container.
const OVERLAY_STYLE: [(&str, &str); 6] = [
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("pointer-events", "none"),
];

/// Host state written by DOM listeners between frames.
#[derive(Debug, Clone, Copy)]
struct HostState {
    pointer: Option<(f32, f32)>,
    visible: bool,
    resized: bool,
}

/// State shared between the loop handle, the frame callback and listeners.
struct Shared {
    cancelled: Cell<bool>,
    frame_handle: Cell<Option<i32>>,
    /// Ticks run since mount.
    frames: Cell<u64>,
    host: RefCell<HostState>,
    scene: RefCell<Scene>,
    surface: RefCell<CanvasSurface>,
    window: Window,
    canvas: HtmlCanvasElement,
}

impl Shared {
    /// One frame: snapshot host input, apply a pending resize, update, draw.
    fn tick(&self, now_ms: f64) {
        self.frames.set(self.frames.get() + 1);
        let input = {
            let mut host = self.host.borrow_mut();
            if host.resized {
                host.resized = false;
                let viewport = measure(&self.window, &self.canvas);
                apply_backing_store(&self.canvas, viewport);
                self.surface
                    .borrow_mut()
                    .set_pixel_ratio(viewport.pixel_ratio as f64);
                self.scene.borrow_mut().resize(viewport);
                crate::console_log!(
                    "resized to {}x{} @{}x, rebuilt topology",
                    viewport.width,
                    viewport.height,
                    viewport.pixel_ratio
                );
            }
            FrameInput {
                now_ms,
                pointer: host.pointer,
                visible: host.visible,
            }
        };

        let mut scene = self.scene.borrow_mut();
        scene.update(&input);
        if input.visible {
            scene.draw(&mut *self.surface.borrow_mut());
        }
    }

    fn schedule(&self, callback: &FrameCallback) {
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame_handle.set(Some(handle)),
            Err(err) => {
                self.frame_handle.set(None);
                crate::console_error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }
}

/// A registered DOM listener, removed on teardown.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> EngineResult<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| EngineError::dom(format!("addEventListener({kind}): {e:?}")))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// A mounted, running scene.
pub struct RenderLoop {
    shared: Rc<Shared>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    listeners: Vec<Listener>,
    /// Canvas created by mount, removed again on teardown.
    created_canvas: Option<HtmlCanvasElement>,
}

impl RenderLoop {
    /// Attach to `container` and start the frame loop.
    ///
    /// A canvas container is drawn into directly; any other element gets a
    /// full-size overlay canvas appended to it.
    ///
    /// The config is validated by `Scene::new`; a created canvas is removed
    /// again when that or the context lookup fails.
    pub fn mount(container: &Element, config: EngineConfig) -> EngineResult<Self> {
        let window = web_sys::window().ok_or(EngineError::NoWindow)?;
        let document = window.document().ok_or(EngineError::NoWindow)?;

        let (canvas, created_canvas) = match container.dyn_ref::<HtmlCanvasElement>() {
            Some(canvas) => (canvas.clone(), None),
            None => {
                let canvas = create_overlay(&document, container)?;
                (canvas.clone(), Some(canvas))
            }
        };

        let discard_canvas = || {
            if let Some(created) = &created_canvas {
                created.remove();
            }
        };

        let Some(ctx) = context_2d(&canvas) else {
            discard_canvas();
            return Err(EngineError::ContextUnavailable);
        };

        let viewport = measure(&window, &canvas);
        apply_backing_store(&canvas, viewport);
        let mut surface = CanvasSurface::new(ctx);
        surface.set_pixel_ratio(viewport.pixel_ratio as f64);

        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let scene = match Scene::new(config, viewport, seed) {
            Ok(scene) => scene,
            Err(err) => {
                discard_canvas();
                return Err(err.into());
            }
        };

        let shared = Rc::new(Shared {
            cancelled: Cell::new(false),
            frame_handle: Cell::new(None),
            frames: Cell::new(0),
            host: RefCell::new(HostState {
                pointer: None,
                visible: !document.hidden(),
                resized: false,
            }),
            scene: RefCell::new(scene),
            surface: RefCell::new(surface),
            window: window.clone(),
            canvas,
        });

        let mut render_loop = Self {
            shared,
            frame: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
            created_canvas,
        };

        if let Err(err) = render_loop.attach_listeners(&window, &document) {
            render_loop.teardown();
            return Err(err);
        }
        render_loop.start();

        crate::console_log!(
            "mounted: {} particles, {} edges",
            render_loop.particle_count(),
            render_loop.edge_count()
        );
        Ok(render_loop)
    }

    fn attach_listeners(&mut self, window: &Window, document: &Document) -> EngineResult<()> {
        let shared = Rc::clone(&self.shared);
        self.listeners.push(Listener::attach(window, "resize", move |_| {
            shared.host.borrow_mut().resized = true;
        })?);

        let shared = Rc::clone(&self.shared);
        self.listeners
            .push(Listener::attach(window, "pointermove", move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let rect = shared.canvas.get_bounding_client_rect();
                let x = event.client_x() as f64 - rect.left();
                let y = event.client_y() as f64 - rect.top();
                shared.host.borrow_mut().pointer = Some((x as f32, y as f32));
            })?);

        if let Some(root) = document.document_element() {
            let shared = Rc::clone(&self.shared);
            self.listeners
                .push(Listener::attach(&root, "pointerleave", move |_| {
                    shared.host.borrow_mut().pointer = None;
                })?);
        }

        let shared = Rc::clone(&self.shared);
        self.listeners.push(Listener::attach(window, "blur", move |_| {
            shared.host.borrow_mut().pointer = None;
        })?);

        let shared = Rc::clone(&self.shared);
        let doc = document.clone();
        self.listeners
            .push(Listener::attach(document, "visibilitychange", move |_| {
                shared.host.borrow_mut().visible = !doc.hidden();
            })?);

        Ok(())
    }

    /// Build the self-rescheduling frame callback and request the first frame.
    fn start(&mut self) {
        let shared = Rc::clone(&self.shared);
        let slot = Rc::clone(&self.frame);

        *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            if shared.cancelled.get() {
                return;
            }
            shared.tick(now_ms);
            if shared.cancelled.get() {
                return;
            }
            if let Some(callback) = slot.borrow().as_ref() {
                shared.schedule(callback);
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(callback) = self.frame.borrow().as_ref() {
            self.shared.schedule(callback);
        }
    }

    /// Stop the loop and release every host resource. Idempotent.
    pub fn unmount(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.shared.cancelled.replace(true) {
            return;
        }
        if let Some(handle) = self.shared.frame_handle.take() {
            let _ = self.shared.window.cancel_animation_frame(handle);
        }
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        // Breaks the callback -> slot -> callback cycle.
        self.frame.borrow_mut().take();
        if let Some(canvas) = self.created_canvas.take() {
            canvas.remove();
        }
        crate::console_log!("unmounted");
    }

    pub fn is_running(&self) -> bool {
        !self.shared.cancelled.get() && self.shared.frame_handle.get().is_some()
    }

    /// Frames ticked since mount; frozen once torn down.
    pub fn frame_count(&self) -> u64 {
        self.shared.frames.get()
    }

    pub fn particle_count(&self) -> u32 {
        self.shared.scene.borrow().particle_count()
    }

    pub fn edge_count(&self) -> u32 {
        self.shared.scene.borrow().edge_count()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn create_overlay(document: &Document, container: &Element) -> EngineResult<HtmlCanvasElement> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| EngineError::dom(format!("createElement: {e:?}")))?
        .dyn_into()
        .map_err(|_| EngineError::dom("created element is not a canvas"))?;

    let style = canvas.style();
    for (property, value) in OVERLAY_STYLE {
        style
            .set_property(property, value)
            .map_err(|e| EngineError::dom(format!("style {property}: {e:?}")))?;
    }
    canvas.set_attribute("aria-hidden", "true").ok();

    container
        .append_child(&canvas)
        .map_err(|e| EngineError::dom(format!("appendChild: {e:?}")))?;
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Current CSS size of the canvas and the device pixel ratio.
fn measure(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(
        rect.width() as f32,
        rect.height() as f32,
        window.device_pixel_ratio() as f32,
    )
}

/// Size the backing store in device pixels.
fn apply_backing_store(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width((viewport.width * viewport.pixel_ratio).round() as u32);
    canvas.set_height((viewport.height * viewport.pixel_ratio).round() as u32);
}
