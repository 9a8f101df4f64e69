//! Scene - every layer of one engine instance, advanced and drawn per frame.
//!
//! The scene is plain Rust with no browser types; the render loop feeds it
//! one `FrameInput` snapshot per tick and hands it a `Surface` to draw on.
//! Update order within a tick is fixed: morph field, dot field, scan grid.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::backdrop::{
    CorrelationFlashScheduler, FlashTiming, PerspectiveGrid, ScanlineEmitter,
};
use crate::config::{EngineConfig, LayerKind, Palette};
use crate::error::ConfigError;
use crate::force::{ForceField, ForceParams};
use crate::graph::ConnectionGraph;
use crate::particles::{ColorClass, ParticleSimulator};
use crate::render::{Rgb, Surface};

/// Alpha below which nothing is drawn.
const MIN_ALPHA: f32 = 0.003;
const PARTICLE_RADIUS: f32 = 1.6;
const EDGE_WIDTH: f32 = 0.6;
const GRID_LINE_WIDTH: f32 = 1.0;
const FLASH_WIDTH: f32 = 1.5;
const FLASH_NODE_RADIUS: f32 = 3.0;
/// Camera distance as a multiple of the formation's half width.
const FOCAL_FACTOR: f32 = 3.0;

/// Canvas size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }
}

/// Host state snapshotted once at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Frame timestamp in ms (any monotonic origin).
    pub now_ms: f64,
    /// Pointer in canvas CSS pixels, `None` when inactive.
    pub pointer: Option<(f32, f32)>,
    pub visible: bool,
}

struct MorphLayer {
    simulator: ParticleSimulator,
    graph: ConnectionGraph,
}

struct ScanGridLayer {
    grid: PerspectiveGrid,
    scanlines: ScanlineEmitter,
    flashes: CorrelationFlashScheduler,
}

/// All layers of one engine instance.
pub struct Scene {
    config: EngineConfig,
    palette: Palette,
    viewport: Viewport,
    rng: SmallRng,

    /// Timestamp of the first frame; scene time counts from here.
    start_ms: Option<f64>,
    elapsed_ms: f64,
    was_visible: bool,

    morph: Option<MorphLayer>,
    dots: Option<ForceField>,
    scan: Option<ScanGridLayer>,
}

impl Scene {
    /// Validate `config` and build every enabled layer for `viewport`.
    pub fn new(config: EngineConfig, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette()?;
        let mut scene = Self {
            config,
            palette,
            viewport,
            rng: SmallRng::seed_from_u64(seed),
            start_ms: None,
            elapsed_ms: 0.0,
            was_visible: true,
            morph: None,
            dots: None,
            scan: None,
        };
        scene.build();
        Ok(scene)
    }

    /// Rebuild all topology from scratch for a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.build();
    }

    fn build(&mut self) {
        let config = &self.config;

        self.morph = config.has_layer(LayerKind::Morph).then(|| {
            let simulator = ParticleSimulator::new(
                config.particle_count,
                config.grid_spacing,
                config.morph_cycle_duration_seconds,
            );
            let graph = ConnectionGraph::build(
                simulator.store().positions(),
                config.connection_distance_threshold,
            );
            MorphLayer { simulator, graph }
        });

        self.dots = config.has_layer(LayerKind::DotField).then(|| {
            ForceField::lattice(
                self.viewport.width,
                self.viewport.height,
                config.grid_spacing,
                ForceParams::from_config(config),
            )
        });

        self.scan = if config.has_layer(LayerKind::ScanGrid) {
            Some(ScanGridLayer {
                grid: PerspectiveGrid::default(),
                scanlines: ScanlineEmitter::new(self.viewport.height, &mut self.rng),
                flashes: CorrelationFlashScheduler::new(
                    FlashTiming::default(),
                    self.elapsed_ms,
                    &mut self.rng,
                ),
            })
        } else {
            None
        };
    }

    /// Advance every layer by one tick.
    pub fn update(&mut self, input: &FrameInput) {
        if !input.visible {
            self.was_visible = false;
            return;
        }

        let start = *self.start_ms.get_or_insert(input.now_ms);
        self.elapsed_ms = (input.now_ms - start).max(0.0);
        let t = (self.elapsed_ms / 1000.0) as f32;

        if !self.was_visible {
            self.was_visible = true;
            if let Some(scan) = &mut self.scan {
                scan.flashes.restart_idle(self.elapsed_ms);
            }
        }

        if let Some(morph) = &mut self.morph {
            morph.simulator.step(t);
            morph.graph.update(morph.simulator.store().positions());
        }

        if let Some(dots) = &mut self.dots {
            dots.step(input.pointer);
        }

        if let Some(scan) = &mut self.scan {
            scan.scanlines.step(self.viewport.height, &mut self.rng);
            scan.flashes.tick(
                self.elapsed_ms,
                self.viewport.width,
                self.viewport.height,
                &mut self.rng,
            );
        }
    }

    /// Draw the current state back to front.
    pub fn draw(&self, surface: &mut impl Surface) {
        let Viewport { width, height, .. } = self.viewport;
        surface.clear(width, height);
        self.draw_scan_grid(surface);
        self.draw_morph(surface);
        self.draw_dots(surface);
    }

    fn draw_scan_grid(&self, surface: &mut impl Surface) {
        let Some(scan) = &self.scan else {
            return;
        };
        let Viewport { width, height, .. } = self.viewport;
        let t = self.elapsed_seconds();

        for line in scan.grid.lines(width, height, t) {
            surface.line(
                (line.x0, line.y0),
                (line.x1, line.y1),
                GRID_LINE_WIDTH,
                self.palette.base,
                line.alpha,
            );
        }

        for line in scan.scanlines.lines() {
            surface.line(
                (0.0, line.y),
                (width, line.y),
                line.width,
                self.palette.active,
                line.opacity,
            );
        }

        if let Some(flash) = scan.flashes.active() {
            let alpha = flash.opacity(self.elapsed_ms);
            if alpha > MIN_ALPHA {
                surface.line(flash.from, flash.to, FLASH_WIDTH, self.palette.active, alpha);
                for node in [flash.from, flash.to] {
                    surface.circle(node, FLASH_NODE_RADIUS, self.palette.active, alpha);
                }
            }
        }
    }

    fn draw_morph(&self, surface: &mut impl Surface) {
        let Some(morph) = &self.morph else {
            return;
        };
        let store = morph.simulator.store();
        let projection = Projection::fit(&morph.simulator, self.viewport);
        let positions = store.positions();
        let fades = store.fades();

        for (_, a, b, link) in morph.graph.links() {
            let alpha = link.opacity * fades[a.index()].min(fades[b.index()]);
            if alpha <= MIN_ALPHA {
                continue;
            }
            let (Some((pa, _)), Some((pb, _))) = (
                projection.project(positions[a.index()]),
                projection.project(positions[b.index()]),
            ) else {
                continue;
            };
            surface.line(pa, pb, EDGE_WIDTH, self.palette.base, alpha);
        }

        for particle in store.iter() {
            if particle.opacity <= MIN_ALPHA {
                continue;
            }
            let Some((point, depth_scale)) = projection.project(particle.position) else {
                continue;
            };
            let color = match particle.color {
                ColorClass::Base => self.palette.base,
                ColorClass::Accent => self.palette.active,
            };
            surface.circle(point, PARTICLE_RADIUS * depth_scale, color, particle.opacity);
        }
    }

    fn draw_dots(&self, surface: &mut impl Surface) {
        let Some(dots) = &self.dots else {
            return;
        };
        for dot in dots.dots() {
            let color: Rgb = self.palette.base.mix(self.palette.active, dot.emphasis);
            surface.circle((dot.x, dot.y), dot.radius, color, dot.alpha);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds since the first visible frame.
    pub fn elapsed_seconds(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }

    pub fn simulator(&self) -> Option<&ParticleSimulator> {
        self.morph.as_ref().map(|m| &m.simulator)
    }

    pub fn connections(&self) -> Option<&ConnectionGraph> {
        self.morph.as_ref().map(|m| &m.graph)
    }

    pub fn force_field(&self) -> Option<&ForceField> {
        self.dots.as_ref()
    }

    pub fn flashes(&self) -> Option<&CorrelationFlashScheduler> {
        self.scan.as_ref().map(|s| &s.flashes)
    }

    pub fn scanlines(&self) -> Option<&ScanlineEmitter> {
        self.scan.as_ref().map(|s| &s.scanlines)
    }

    /// Morph particles plus dots.
    pub fn particle_count(&self) -> u32 {
        let morph = self.simulator().map_or(0, |s| s.len());
        let dots = self.force_field().map_or(0, |f| f.len());
        (morph + dots) as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.connections().map_or(0, |g| g.edge_count())
    }
}

/// World -> screen mapping for the morph field.
#[derive(Debug, Clone, Copy)]
struct Projection {
    center_x: f32,
    center_y: f32,
    scale: f32,
    focal: f32,
}

impl Projection {
    /// Fit the formation's horizontal bounds to the viewport width.
    fn fit(simulator: &ParticleSimulator, viewport: Viewport) -> Self {
        let half_width = simulator.layout().travel_span();
        Self {
            center_x: viewport.width * 0.5,
            center_y: viewport.height * 0.5,
            scale: viewport.width / (2.0 * half_width),
            focal: half_width * FOCAL_FACTOR,
        }
    }

    /// Screen position and depth scale `f / (f + z)`; `None` at or behind
    /// the camera.
    fn project(&self, p: Vec3) -> Option<((f32, f32), f32)> {
        let denom = self.focal + p.z;
        if denom <= f32::EPSILON {
            return None;
        }
        let depth_scale = self.focal / denom;
        let s = self.scale * depth_scale;
        Some((
            (self.center_x + p.x * s, self.center_y - p.y * s),
            depth_scale,
        ))
    }
}
