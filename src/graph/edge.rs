//! Edge payload for the connection graph.
//!
//! Each edge carries:
//! - The distance between its endpoints on the construction-time layout
//! - The opacity derived from the live distance on the latest frame

use std::fmt;

/// Stable edge identifier, assigned in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Create a new EdgeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

/// Peak alpha of a connection line between coincident particles.
pub const BASE_OPACITY: f32 = 0.15;

/// Weight stored on every graph edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Distance on the initial layout. Never updated.
    pub rest_distance: f32,
    /// Live distance from the most recent update.
    pub distance: f32,
    /// Rendered alpha from the most recent update.
    pub opacity: f32,
}

impl Link {
    pub fn new(rest_distance: f32, max_distance: f32) -> Self {
        Self {
            rest_distance,
            distance: rest_distance,
            opacity: Self::opacity_for(rest_distance, max_distance),
        }
    }

    /// `max(0, BASE_OPACITY * (1 - distance / max_distance))`.
    #[inline]
    pub fn opacity_for(distance: f32, max_distance: f32) -> f32 {
        (BASE_OPACITY * (1.0 - distance / max_distance)).max(0.0)
    }

    /// Refresh live distance and opacity.
    #[inline]
    pub fn update(&mut self, distance: f32, max_distance: f32) {
        self.distance = distance;
        self.opacity = Self::opacity_for(distance, max_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Edge(42)");
    }

    #[test]
    fn test_opacity_falls_off_linearly() {
        assert_eq!(Link::opacity_for(0.0, 10.0), BASE_OPACITY);
        assert!((Link::opacity_for(5.0, 10.0) - BASE_OPACITY * 0.5).abs() < 1e-6);
        assert_eq!(Link::opacity_for(10.0, 10.0), 0.0);
        assert_eq!(Link::opacity_for(1e6, 10.0), 0.0);
    }

    #[test]
    fn test_update_keeps_rest_distance() {
        let mut link = Link::new(3.0, 10.0);
        link.update(50.0, 10.0);
        assert_eq!(link.rest_distance, 3.0);
        assert_eq!(link.distance, 50.0);
        assert_eq!(link.opacity, 0.0);
    }
}
