//! ForceField - pointer-reactive dot grid.
//!
//! Dots rest on a screen-space lattice. Per frame, each dot:
//!
//! 1. reads its distance to the pointer from its frame-start position
//! 2. gets a dispersion impulse away from the pointer when inside the radius
//! 3. gets a restoring acceleration toward its origin (frame-start position)
//! 4. has its velocity damped by friction
//! 5. integrates `position += velocity`
//!
//! The order is fixed; changing it changes the visuals.

use glam::FloatExt;

use crate::config::EngineConfig;

/// Dot radius with the pointer far away.
pub const BASE_RADIUS: f32 = 1.5;
/// Dot radius with the pointer directly on it.
pub const MAX_RADIUS: f32 = 4.0;
/// Alpha with the pointer far away.
pub const BASE_ALPHA: f32 = 0.15;
/// Alpha added at full emphasis.
pub const ALPHA_GAIN: f32 = 0.65;
/// Peak impulse per frame at the pointer.
pub const DISPERSION_FORCE: f32 = 3.0;

/// Upper bound on dots in one field.
pub const MAX_DOTS: usize = 20_000;

/// Tunables taken from the engine config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub interaction_radius: f32,
    pub return_speed: f32,
    pub friction: f32,
    pub dispersion_force: f32,
}

impl ForceParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            interaction_radius: config.interaction_radius,
            return_speed: config.return_speed,
            friction: config.friction_coefficient,
            dispersion_force: DISPERSION_FORCE,
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Render-facing view of one dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    /// `strength²` in `[0, 1]`; drives color toward the active color.
    pub emphasis: f32,
}

/// Emphasis for a pointer at `distance`: `(1 - distance / radius)²`, 0 outside.
#[inline]
pub fn emphasis(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        return 0.0;
    }
    let strength = (1.0 - distance / radius).max(0.0);
    strength * strength
}

/// The interactive dot grid.
#[derive(Debug, Clone)]
pub struct ForceField {
    params: ForceParams,

    /// Rest positions (SoA layout)
    origin_x: Vec<f32>,
    origin_y: Vec<f32>,

    /// Current positions (SoA layout)
    pos_x: Vec<f32>,
    pos_y: Vec<f32>,

    /// Velocities (SoA layout)
    vel_x: Vec<f32>,
    vel_y: Vec<f32>,

    /// Pointer emphasis from the last step
    emphasis: Vec<f32>,
}

impl ForceField {
    /// Create an empty field.
    pub fn new(params: ForceParams) -> Self {
        Self {
            params,
            origin_x: Vec::new(),
            origin_y: Vec::new(),
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            vel_x: Vec::new(),
            vel_y: Vec::new(),
            emphasis: Vec::new(),
        }
    }

    /// Fill a `width` x `height` viewport with dots every `spacing` px,
    /// offset by half a cell from the top-left corner.
    ///
    /// The spacing is widened as needed so the field never holds more than
    /// `MAX_DOTS` dots, whatever the viewport.
    pub fn lattice(width: f32, height: f32, spacing: f32, params: ForceParams) -> Self {
        let mut field = Self::new(params);
        if !(spacing > 0.0 && width > 0.0 && height > 0.0)
            || !(spacing.is_finite() && width.is_finite() && height.is_finite())
        {
            return field;
        }

        let mut spacing = spacing.max((width * height / MAX_DOTS as f32).sqrt());
        let dims = |s: f32| ((width / s).ceil() as usize, (height / s).ceil() as usize);
        let (mut cols, mut rows) = dims(spacing);
        while cols * rows > MAX_DOTS {
            spacing *= 1.01;
            (cols, rows) = dims(spacing);
        }

        for row in 0..rows {
            for col in 0..cols {
                field.add_dot(
                    (col as f32 + 0.5) * spacing,
                    (row as f32 + 0.5) * spacing,
                );
            }
        }
        field
    }

    /// Add a dot resting at (x, y).
    pub fn add_dot(&mut self, x: f32, y: f32) -> usize {
        self.origin_x.push(x);
        self.origin_y.push(y);
        self.pos_x.push(x);
        self.pos_y.push(y);
        self.vel_x.push(0.0);
        self.vel_y.push(0.0);
        self.emphasis.push(0.0);
        self.pos_x.len() - 1
    }

    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Advance one frame. `pointer` is the frame's pointer snapshot, `None`
    /// when inactive.
    pub fn step(&mut self, pointer: Option<(f32, f32)>) {
        let ForceParams {
            interaction_radius,
            return_speed,
            friction,
            dispersion_force,
        } = self.params;

        for i in 0..self.pos_x.len() {
            let x = self.pos_x[i];
            let y = self.pos_y[i];
            let mut vx = self.vel_x[i];
            let mut vy = self.vel_y[i];
            let mut glow = 0.0;

            if let Some((px, py)) = pointer {
                let dx = px - x;
                let dy = py - y;
                let distance = (dx * dx + dy * dy).sqrt();
                glow = emphasis(distance, interaction_radius);
                // Coincident with the pointer: no direction, skip the push.
                if glow > 0.0 && distance > 0.0 {
                    vx -= dx / distance * dispersion_force * glow;
                    vy -= dy / distance * dispersion_force * glow;
                }
            }

            vx += (self.origin_x[i] - x) * return_speed;
            vy += (self.origin_y[i] - y) * return_speed;
            vx *= friction;
            vy *= friction;

            self.vel_x[i] = vx;
            self.vel_y[i] = vy;
            self.pos_x[i] = x + vx;
            self.pos_y[i] = y + vy;
            self.emphasis[i] = glow;
        }
    }

    /// View of dot `i` for drawing.
    pub fn dot(&self, i: usize) -> Option<Dot> {
        let glow = *self.emphasis.get(i)?;
        Some(Dot {
            x: self.pos_x[i],
            y: self.pos_y[i],
            radius: FloatExt::lerp(BASE_RADIUS, MAX_RADIUS, glow),
            alpha: BASE_ALPHA + ALPHA_GAIN * glow,
            emphasis: glow,
        })
    }

    pub fn dots(&self) -> impl Iterator<Item = Dot> + '_ {
        (0..self.len()).filter_map(|i| self.dot(i))
    }

    /// Velocity of dot `i`.
    pub fn velocity(&self, i: usize) -> Option<(f32, f32)> {
        Some((*self.vel_x.get(i)?, self.vel_y[i]))
    }

    #[cfg(test)]
    fn set_velocity(&mut self, i: usize, vx: f32, vy: f32) {
        self.vel_x[i] = vx;
        self.vel_y[i] = vy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_dot(params: ForceParams) -> ForceField {
        let mut field = ForceField::new(params);
        field.add_dot(100.0, 100.0);
        field
    }

    #[test]
    fn test_lattice_covers_viewport() {
        let field = ForceField::lattice(100.0, 50.0, 20.0, ForceParams::default());
        // ceil(100/20) x ceil(50/20) = 5 x 3
        assert_eq!(field.len(), 15);
        let first = field.dot(0).unwrap();
        assert_eq!((first.x, first.y), (10.0, 10.0));
        assert!(ForceField::lattice(0.0, 50.0, 20.0, ForceParams::default()).is_empty());
    }

    #[test]
    fn test_lattice_is_capped_for_dense_spacing() {
        let field = ForceField::lattice(1920.0, 1080.0, 1e-4, ForceParams::default());
        assert!(field.len() <= MAX_DOTS);
        assert!(field.len() > MAX_DOTS * 9 / 10, "only {} dots", field.len());
        for dot in field.dots() {
            assert!(dot.x > 0.0 && dot.x < 1920.0 + 30.0);
            assert!(dot.y > 0.0 && dot.y < 1080.0 + 30.0);
        }

        let huge = ForceField::lattice(1e7, 1e7, 1.0, ForceParams::default());
        assert!(huge.len() <= MAX_DOTS);
    }

    #[test]
    fn test_pointer_on_dot_gives_max_emphasis_and_no_push() {
        let mut field = single_dot(ForceParams::default());
        field.step(Some((100.0, 100.0)));

        let dot = field.dot(0).unwrap();
        assert_eq!(dot.radius, MAX_RADIUS);
        assert!((dot.alpha - (0.15 + 0.65)).abs() < 1e-6);
        // Zero distance: impulse skipped, spring has nothing to restore.
        assert_eq!(field.velocity(0), Some((0.0, 0.0)));
        assert_eq!((dot.x, dot.y), (100.0, 100.0));
    }

    #[test]
    fn test_pointer_outside_radius_contributes_nothing() {
        let params = ForceParams::default();
        let mut field = single_dot(params);
        field.step(Some((100.0 + params.interaction_radius, 100.0)));

        let dot = field.dot(0).unwrap();
        assert_eq!(field.velocity(0), Some((0.0, 0.0)));
        assert_eq!(dot.radius, BASE_RADIUS);
        assert_eq!(dot.alpha, BASE_ALPHA);
        assert_eq!(emphasis(params.interaction_radius, params.interaction_radius), 0.0);
        assert_eq!(emphasis(1e9, params.interaction_radius), 0.0);
    }

    #[test]
    fn test_dispersion_pushes_away_from_pointer() {
        let params = ForceParams {
            return_speed: 0.0,
            friction: 1.0,
            ..ForceParams::default()
        };
        let mut field = single_dot(params);
        // Pointer to the left of the dot: the dot moves right.
        field.step(Some((70.0, 100.0)));

        let glow = emphasis(30.0, params.interaction_radius);
        let (vx, vy) = field.velocity(0).unwrap();
        assert!((vx - params.dispersion_force * glow).abs() < 1e-5);
        assert_eq!(vy, 0.0);
        assert!(field.dot(0).unwrap().x > 100.0);
    }

    #[test]
    fn test_friction_decays_velocity_geometrically() {
        let params = ForceParams {
            return_speed: 0.0,
            friction: 0.9,
            ..ForceParams::default()
        };
        let mut field = single_dot(params);
        field.set_velocity(0, 3.0, -4.0);

        let frames = 25;
        for _ in 0..frames {
            field.step(None);
        }

        let (vx, vy) = field.velocity(0).unwrap();
        let magnitude = (vx * vx + vy * vy).sqrt();
        let expected = 5.0 * 0.9_f32.powi(frames);
        assert!((magnitude - expected).abs() < 1e-4);
    }

    #[test]
    fn test_spring_uses_frame_start_position() {
        let params = ForceParams {
            return_speed: 0.1,
            friction: 0.9,
            ..ForceParams::default()
        };
        let mut field = single_dot(params);
        field.set_velocity(0, 10.0, 0.0);
        field.step(None); // position 100 -> 109 (spring sees 100: no pull)
        let (vx, _) = field.velocity(0).unwrap();
        assert!((vx - 9.0).abs() < 1e-5);

        field.step(None);
        // Spring from x = 109: (100 - 109) * 0.1 = -0.9; (9 - 0.9) * 0.9 = 7.29
        let (vx, _) = field.velocity(0).unwrap();
        assert!((vx - 7.29).abs() < 1e-4);
    }

    #[test]
    fn test_returns_to_rest_after_disturbance() {
        let mut field = single_dot(ForceParams::default());
        for _ in 0..10 {
            field.step(Some((90.0, 95.0)));
        }
        for _ in 0..600 {
            field.step(None);
        }
        let dot = field.dot(0).unwrap();
        assert!((dot.x - 100.0).abs() < 1e-2 && (dot.y - 100.0).abs() < 1e-2);
    }
}
