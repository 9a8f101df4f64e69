//! Ambient Field - WASM Module
//!
//! Decorative, low-opacity animated backdrops drawn on a 2D canvas: a
//! particle formation that morphs between a grid, a sphere and a double
//! helix, an interactive dot field that scatters away from the pointer, and
//! a scrolling perspective "scan grid" with correlation flashes.
//!
//! # Architecture
//!
//! - `config`: typed engine options, parsed from JS and validated at mount
//! - `layout`: formation target positions and the morph cycle
//! - `particles`: particle arena and the per-frame morph simulation
//! - `graph`: static proximity links between morph particles (petgraph)
//! - `spatial`: R-tree pair queries used to build the links (rstar)
//! - `force`: the pointer-reactive dot field
//! - `backdrop`: perspective grid, scanlines and correlation flashes
//! - `render`: the `Surface` drawing abstraction and its canvas backend
//! - `engine`: scene composition and the browser render loop

#[macro_use]
pub mod log;

pub mod backdrop;
pub mod config;
pub mod engine;
pub mod error;
pub mod force;
pub mod graph;
pub mod layout;
pub mod particles;
pub mod render;
pub mod spatial;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use config::EngineConfig;
use engine::RenderLoop;
use error::EngineError;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Handle to one mounted engine instance.
///
/// An engine whose canvas could not provide a 2D context is inert: it is
/// returned normally, draws nothing and reports zero counts.
#[wasm_bindgen]
#[derive(Default)]
pub struct AmbientEngine {
    render_loop: Option<RenderLoop>,
}

#[wasm_bindgen]
impl AmbientEngine {
    /// Mount on `container` and start animating.
    ///
    /// `config` is a plain object of camelCase options; `undefined` selects
    /// every default. Invalid options reject with a descriptive error before
    /// anything is attached to the page.
    pub fn mount(container: &Element, config: JsValue) -> Result<AmbientEngine, JsValue> {
        let config = EngineConfig::from_js(config).map_err(to_js_error)?;
        config.validate().map_err(to_js_error)?;

        match RenderLoop::mount(container, config) {
            Ok(render_loop) => Ok(Self {
                render_loop: Some(render_loop),
            }),
            Err(EngineError::ContextUnavailable) => {
                console_warn!("2d context unavailable, engine is inert");
                Ok(Self::default())
            }
            Err(err) => Err(to_js_error(err)),
        }
    }

    /// Stop the loop, detach every listener and remove any canvas the engine
    /// created. Safe to call more than once; the counters stay readable.
    pub fn unmount(&mut self) {
        if let Some(render_loop) = &mut self.render_loop {
            render_loop.unmount();
        }
    }

    /// Frames ticked since mount. Does not advance after `unmount`.
    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.render_loop.as_ref().map_or(0, |r| r.frame_count()) as f64
    }

    /// Morph particles plus dot-field dots.
    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.render_loop.as_ref().map_or(0, |r| r.particle_count())
    }

    /// Number of proximity links between morph particles.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.render_loop.as_ref().map_or(0, |r| r.edge_count())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.render_loop.as_ref().is_some_and(|r| r.is_running())
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
