//! Engine configuration.
//!
//! An `EngineConfig` is decoded once from the host's options object and is
//! never mutated afterwards. Changing any option means unmounting and
//! mounting a new engine.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::layout::FormationLayout;
use crate::render::Rgb;

/// Upper bound on morph particles; connection-graph construction is a
/// one-time cost but still grows with the square of the count.
pub const MAX_PARTICLES: usize = 10_000;

/// Accepted `gridSpacing` range. Below it the dot field degenerates into a
/// solid fill; above it the formation extent leaves f32 precision.
pub const MIN_GRID_SPACING: f32 = 1.0;
pub const MAX_GRID_SPACING: f32 = 1000.0;

/// `connectionDistanceThreshold` may reach at most this many grid cells.
pub const MAX_LINK_CELLS: f32 = 8.0;

/// Accepted `morphCycleDurationSeconds` range.
pub const MIN_CYCLE_SECONDS: f32 = 0.5;
pub const MAX_CYCLE_SECONDS: f32 = 3600.0;

/// Largest stable `returnSpeed` for the dot field's spring.
pub const MAX_RETURN_SPEED: f32 = 1.0;

/// A visual layer an engine instance can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    /// Morphing particle formation with its connection graph.
    Morph,
    /// Pointer-reactive dot grid.
    DotField,
    /// Perspective grid, scanlines and correlation flashes.
    ScanGrid,
}

/// Immutable configuration snapshot consumed at construction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Number of morph particles (default: 400).
    pub particle_count: usize,
    /// Lattice spacing of the formation grid and of the dot field (default: 30.0).
    pub grid_spacing: f32,
    /// Pointer interaction radius for the dot field, CSS px (default: 120.0).
    pub interaction_radius: f32,
    /// Idle color as a hex string (default: "#64748b").
    pub base_color: String,
    /// Highlight color as a hex string (default: "#38bdf8").
    pub active_color: String,
    /// Spring constant pulling dots back to rest (default: 0.05).
    pub return_speed: f32,
    /// Per-frame velocity damping (default: 0.9).
    pub friction_coefficient: f32,
    /// Connection threshold on the initial layout, also the opacity falloff
    /// distance for live edges (default: 45.0).
    pub connection_distance_threshold: f32,
    /// Period of the morph cycle in seconds (default: 30.0).
    pub morph_cycle_duration_seconds: f32,
    /// Layers to drive, in fixed draw order (default: morph only).
    pub layers: Vec<LayerKind>,
    /// RNG seed. Mount derives one from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle_count: 400,
            grid_spacing: 30.0,
            interaction_radius: 120.0,
            base_color: "#64748b".to_string(),
            active_color: "#38bdf8".to_string(),
            return_speed: 0.05,
            friction_coefficient: 0.9,
            connection_distance_threshold: 45.0,
            morph_cycle_duration_seconds: 30.0,
            layers: vec![LayerKind::Morph],
            seed: None,
        }
    }
}

/// Colors resolved from a validated config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Rgb,
    pub active: Rgb,
}

impl EngineConfig {
    /// Decode from a JS options object. `undefined`/`null` yields defaults.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::malformed(e.to_string()))
    }

    /// Check every option, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::ParticleCount {
                value: self.particle_count,
                max: MAX_PARTICLES,
            });
        }

        positive("gridSpacing", self.grid_spacing)?;
        positive("interactionRadius", self.interaction_radius)?;
        positive(
            "connectionDistanceThreshold",
            self.connection_distance_threshold,
        )?;
        positive(
            "morphCycleDurationSeconds",
            self.morph_cycle_duration_seconds,
        )?;

        in_range(
            "gridSpacing",
            self.grid_spacing,
            MIN_GRID_SPACING,
            MAX_GRID_SPACING,
        )?;
        in_range(
            "connectionDistanceThreshold",
            self.connection_distance_threshold,
            0.0,
            self.grid_spacing * MAX_LINK_CELLS,
        )?;
        in_range(
            "morphCycleDurationSeconds",
            self.morph_cycle_duration_seconds,
            MIN_CYCLE_SECONDS,
            MAX_CYCLE_SECONDS,
        )?;
        in_range("returnSpeed", self.return_speed, 0.0, MAX_RETURN_SPEED)?;

        let layout = FormationLayout::new(self.particle_count, self.grid_spacing);
        let (left, right) = layout.bounds();
        if !(layout.travel_span().is_finite() && (right - left).is_finite()) {
            return Err(ConfigError::FieldExtent {
                half_width: layout.travel_span(),
            });
        }

        if !(0.0..=1.0).contains(&self.friction_coefficient) {
            return Err(ConfigError::Friction(self.friction_coefficient));
        }

        self.palette()?;

        if self.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }

        Ok(())
    }

    /// Parse both colors.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            Rgb::parse_hex(value).ok_or_else(|| ConfigError::Color {
                field,
                value: value.to_string(),
            })
        };
        Ok(Palette {
            base: parse("baseColor", &self.base_color)?,
            active: parse("activeColor", &self.active_color)?,
        })
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.contains(&kind)
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
