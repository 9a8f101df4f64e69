//! Closed-form particle formations.
//!
//! Every formation maps a particle index (and the elapsed time) to a world
//! position. The three shapes share one lattice so that index `i` occupies
//! the same row/column in the grid and on the sphere.
//!
//! World units are abstract: the renderer fits the formation bounds to the
//! canvas width.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Width of the fade-in/fade-out band at each horizontal bound.
pub const EDGE_FADE_WIDTH: f32 = 20.0;

/// Rate of the horizontal travel cycle, in cycles of `(t * speed) mod 2` per second.
pub const TRAVEL_SPEED: f32 = 0.02;

const SPHERE_SPIN: f32 = 0.1;
const HELIX_SPIN: f32 = 0.2;
const HELIX_TURNS: f32 = 3.0;

/// A named formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formation {
    Grid,
    Sphere,
    Helix,
}

/// Lattice geometry shared by all formations for a given particle count.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationLayout {
    count: usize,
    cols: usize,
    rows: usize,
    spacing: f32,
    half_width: f32,
}

impl FormationLayout {
    /// Build the layout for `count` particles on a near-square lattice.
    pub fn new(count: usize, spacing: f32) -> Self {
        let count = count.max(1);
        let cols = (count as f32).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        let half_width = cols as f32 * spacing * 0.5 + EDGE_FADE_WIDTH;
        Self {
            count,
            cols,
            rows,
            spacing,
            half_width,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Horizontal bounds `(left, right)` of the travelling field.
    pub fn bounds(&self) -> (f32, f32) {
        (-self.half_width, self.half_width)
    }

    /// Distance covered by one unit of the travel cycle; two units span the
    /// whole field so the wrap lands back on the origin.
    pub fn travel_span(&self) -> f32 {
        self.half_width
    }

    #[inline]
    fn cell(&self, i: usize) -> (usize, usize) {
        (i % self.cols, i / self.cols)
    }

    /// Rest position of particle `i`: its lattice slot, centered on the origin.
    pub fn lattice(&self, i: usize) -> Vec3 {
        let (col, row) = self.cell(i);
        let x = (col as f32 - (self.cols - 1) as f32 * 0.5) * self.spacing;
        let y = (row as f32 - (self.rows - 1) as f32 * 0.5) * self.spacing;
        Vec3::new(x, y, 0.0)
    }

    /// Travelled horizontal position for a particle resting at `origin_x`.
    ///
    /// The offset cycles through `[0, 2)` spans and the result is wrapped
    /// into the field bounds, so the motion loops without a jump.
    pub fn travel_x(&self, origin_x: f32, t: f32) -> f32 {
        let offset = (t * TRAVEL_SPEED).rem_euclid(2.0) * self.travel_span();
        let (left, right) = self.bounds();
        left + (origin_x + offset - left).rem_euclid(right - left)
    }

    /// Grid formation: the lattice slot with its x replaced by the travelled x.
    pub fn grid(&self, i: usize, travel_x: f32) -> Vec3 {
        let rest = self.lattice(i);
        Vec3::new(travel_x, rest.y, rest.z)
    }

    /// Sphere formation: row maps to polar angle, column to azimuth.
    pub fn sphere(&self, i: usize, t: f32) -> Vec3 {
        let (col, row) = self.cell(i);
        let radius = self.rows as f32 * self.spacing * 0.5;
        let phi = PI * (row as f32 + 0.5) / self.rows as f32;
        let theta = TAU * col as f32 / self.cols as f32 + t * SPHERE_SPIN;
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    }

    /// Helix formation: a double strand laid along x by normalized index.
    pub fn helix(&self, i: usize, t: f32) -> Vec3 {
        let u = if self.count > 1 {
            i as f32 / (self.count - 1) as f32
        } else {
            0.0
        };
        let radius = self.rows as f32 * self.spacing * 0.3;
        let length = self.cols as f32 * self.spacing;
        let strand = if i % 2 == 0 { 0.0 } else { PI };
        let angle = u * TAU * HELIX_TURNS + t * HELIX_SPIN + strand;
        Vec3::new(
            (u - 0.5) * length,
            radius * angle.cos(),
            radius * angle.sin(),
        )
    }

    /// Position of particle `i` in `formation`.
    pub fn target(&self, formation: Formation, i: usize, t: f32, travel_x: f32) -> Vec3 {
        match formation {
            Formation::Grid => self.grid(i, travel_x),
            Formation::Sphere => self.sphere(i, t),
            Formation::Helix => self.helix(i, t),
        }
    }

    /// Fade factor for a horizontal position: ramps over `EDGE_FADE_WIDTH`
    /// inside each bound, clamped to `[0, 1]`.
    pub fn edge_fade(&self, x: f32) -> f32 {
        let (left, right) = self.bounds();
        let fade_in = (x - left) / EDGE_FADE_WIDTH;
        let fade_out = (right - x) / EDGE_FADE_WIDTH;
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_lattice_dimensions() {
        let layout = FormationLayout::new(64, 6.0);
        assert_eq!((layout.cols(), layout.rows()), (8, 8));

        let layout = FormationLayout::new(10, 1.0);
        assert_eq!((layout.cols(), layout.rows()), (4, 3));
    }

    #[test]
    fn test_lattice_is_centered() {
        let layout = FormationLayout::new(64, 6.0);
        assert_eq!(layout.lattice(0), Vec3::new(-21.0, -21.0, 0.0));
        assert_eq!(layout.lattice(63), Vec3::new(21.0, 21.0, 0.0));
        assert_eq!(layout.bounds(), (-44.0, 44.0));
    }

    #[test]
    fn test_travel_starts_at_origin_and_loops() {
        let layout = FormationLayout::new(64, 6.0);
        let x0 = layout.lattice(9).x;
        assert!((layout.travel_x(x0, 0.0) - x0).abs() < EPS);

        // One full cycle of (t * speed) mod 2 returns to the origin.
        let period = 2.0 / TRAVEL_SPEED;
        assert!((layout.travel_x(x0, period) - x0).abs() < 1e-2);

        let (left, right) = layout.bounds();
        for step in 0..200 {
            let x = layout.travel_x(x0, step as f32 * 0.73);
            assert!(x >= left && x < right, "x {x} left the field");
        }
    }

    #[test]
    fn test_sphere_points_lie_on_radius() {
        let layout = FormationLayout::new(100, 2.0);
        let radius = layout.rows() as f32 * 2.0 * 0.5;
        for i in 0..100 {
            let p = layout.sphere(i, 3.0);
            assert!((p.length() - radius).abs() < EPS * radius);
        }
    }

    #[test]
    fn test_helix_spans_length() {
        let layout = FormationLayout::new(50, 4.0);
        let first = layout.helix(0, 0.0);
        let last = layout.helix(49, 0.0);
        let length = layout.cols() as f32 * 4.0;
        assert!((first.x + length * 0.5).abs() < EPS);
        assert!((last.x - length * 0.5).abs() < EPS);
    }

    #[test]
    fn test_single_particle_is_finite() {
        let layout = FormationLayout::new(1, 5.0);
        for formation in [Formation::Grid, Formation::Sphere, Formation::Helix] {
            let p = layout.target(formation, 0, 1.0, 0.0);
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        }
    }

    #[test]
    fn test_edge_fade_ramps() {
        let layout = FormationLayout::new(64, 6.0);
        let (left, right) = layout.bounds();
        assert_eq!(layout.edge_fade(left), 0.0);
        assert!((layout.edge_fade(left + 10.0) - 0.5).abs() < EPS);
        assert_eq!(layout.edge_fade(0.0), 1.0);
        assert!((layout.edge_fade(right - 5.0) - 0.25).abs() < EPS);
        assert_eq!(layout.edge_fade(right + 3.0), 0.0);
    }
}
