//! Error types.
//!
//! Configuration problems are reported once, at mount time. Nothing in the
//! per-frame path returns these; frame-level numeric edge cases are skipped
//! in place instead.

/// Invalid construction-time configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("particleCount must be between 1 and {max}, got {value}")]
    ParticleCount { value: usize, max: usize },

    #[error("{field} must be a finite number greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("formation extent is not finite (half width {half_width})")]
    FieldExtent { half_width: f32 },

    #[error("frictionCoefficient must lie in [0, 1], got {0}")]
    Friction(f32),

    #[error("{field} is not a valid hex color: {value:?}")]
    Color { field: &'static str, value: String },

    #[error("layers must name at least one layer")]
    NoLayers,

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Host environment failures during mount.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no global window available")]
    NoWindow,

    #[error("2d rendering context unavailable")]
    ContextUnavailable,

    #[error("dom error: {0}")]
    Dom(String),
}

impl EngineError {
    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
