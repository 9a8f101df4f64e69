//! PerspectiveGrid - a floor grid receding to a horizon.
//!
//! Vertical lines start on the bottom edge and converge toward a vanishing
//! point on the horizon. They scroll sideways by `(t * scroll_speed) mod
//! grid_size`, which loops seamlessly because a shift of one cell is
//! indistinguishable from no shift. Horizontal bands are spaced by
//! `progress^1.5` so they bunch up near the horizon.

/// Geometry and timing of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Spacing of vertical lines along the bottom edge, CSS px (default: 60.0).
    pub grid_size: f32,
    /// Sideways scroll in px per second (default: 20.0).
    pub scroll_speed: f32,
    /// Horizon height as a fraction of the canvas height (default: 0.45).
    pub horizon_ratio: f32,
    /// How far a line's top end stays from the vanishing point (default: 0.1).
    pub convergence: f32,
    /// Number of horizontal bands (default: 14).
    pub bands: usize,
    /// Alpha of vertical lines (default: 0.08).
    pub line_alpha: f32,
    /// Alpha of the band nearest the viewer (default: 0.14).
    pub band_alpha: f32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            grid_size: 60.0,
            scroll_speed: 20.0,
            horizon_ratio: 0.45,
            convergence: 0.1,
            bands: 14,
            line_alpha: 0.08,
            band_alpha: 0.14,
        }
    }
}

/// A line segment in CSS px with its alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub alpha: f32,
}

/// Stateless grid generator; all motion is a function of time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerspectiveGrid {
    style: GridStyle,
}

impl PerspectiveGrid {
    pub fn new(style: GridStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &GridStyle {
        &self.style
    }

    pub fn horizon_y(&self, height: f32) -> f32 {
        height * self.style.horizon_ratio
    }

    /// Sideways offset in `[0, grid_size)`.
    pub fn scroll_offset(&self, t: f32) -> f32 {
        (t * self.style.scroll_speed).rem_euclid(self.style.grid_size)
    }

    /// Converging lines. Bottom ends span `[-width, 2 * width]` so the
    /// slanted outer lines still cover the upper corners.
    pub fn vertical_lines(&self, width: f32, height: f32, t: f32) -> Vec<GridLine> {
        let size = self.style.grid_size;
        if size <= 0.0 || width <= 0.0 {
            return Vec::new();
        }
        let vanish_x = width * 0.5;
        let horizon_y = self.horizon_y(height);
        let offset = self.scroll_offset(t);

        let first = (-width / size).floor() as i64;
        let last = (2.0 * width / size).ceil() as i64;
        (first..=last)
            .map(|k| {
                let x = k as f32 * size + offset;
                GridLine {
                    x0: x,
                    y0: height,
                    x1: vanish_x + (x - vanish_x) * self.style.convergence,
                    y1: horizon_y,
                    alpha: self.style.line_alpha,
                }
            })
            .collect()
    }

    /// Depth-compressed horizontal bands, faint near the horizon.
    pub fn horizontal_bands(&self, width: f32, height: f32) -> Vec<GridLine> {
        let horizon_y = self.horizon_y(height);
        let depth = height - horizon_y;
        let bands = self.style.bands;
        (1..=bands)
            .map(|k| {
                let progress = k as f32 / bands as f32;
                let y = horizon_y + depth * progress.powf(1.5);
                GridLine {
                    x0: 0.0,
                    y0: y,
                    x1: width,
                    y1: y,
                    alpha: self.style.band_alpha * progress,
                }
            })
            .collect()
    }

    /// Every line of the grid at time `t`.
    pub fn lines(&self, width: f32, height: f32, t: f32) -> Vec<GridLine> {
        let mut lines = self.vertical_lines(width, height, t);
        lines.extend(self.horizontal_bands(width, height));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_lines_converge_to_horizon() {
        let grid = PerspectiveGrid::default();
        let (w, h) = (800.0, 600.0);
        for line in grid.vertical_lines(w, h, 1.3) {
            assert_eq!(line.y0, h);
            assert!((line.y1 - grid.horizon_y(h)).abs() < EPS);
            let expected = w * 0.5 + (line.x0 - w * 0.5) * 0.1;
            assert!((line.x1 - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_scroll_loops_after_one_cell() {
        let grid = PerspectiveGrid::default();
        let style = *grid.style();
        let period = style.grid_size / style.scroll_speed;

        assert!(grid.scroll_offset(0.0).abs() < EPS);
        let a = grid.vertical_lines(800.0, 600.0, 0.7);
        let b = grid.vertical_lines(800.0, 600.0, 0.7 + period);
        assert_eq!(a.len(), b.len());
        for (la, lb) in a.iter().zip(&b) {
            assert!((la.x0 - lb.x0).abs() < EPS);
        }
        for step in 0..100 {
            let offset = grid.scroll_offset(step as f32 * 0.37);
            assert!((0.0..style.grid_size).contains(&offset));
        }
    }

    #[test]
    fn test_bands_compress_toward_horizon() {
        let grid = PerspectiveGrid::default();
        let (w, h) = (800.0, 600.0);
        let bands = grid.horizontal_bands(w, h);
        assert_eq!(bands.len(), grid.style().bands);

        let last = bands.last().unwrap();
        assert!((last.y0 - h).abs() < EPS);
        assert!((last.alpha - grid.style().band_alpha).abs() < 1e-6);

        // Gaps grow with progress; alpha grows with progress.
        for pair in bands.windows(3) {
            let gap_near = pair[2].y0 - pair[1].y0;
            let gap_far = pair[1].y0 - pair[0].y0;
            assert!(gap_near > gap_far);
            assert!(pair[1].alpha > pair[0].alpha);
        }
        let first = bands[0];
        let progress = 1.0 / bands.len() as f32;
        let expected = grid.horizon_y(h) + (h - grid.horizon_y(h)) * progress.powf(1.5);
        assert!((first.y0 - expected).abs() < EPS);
    }

    #[test]
    fn test_degenerate_viewport_draws_nothing_vertical() {
        let grid = PerspectiveGrid::default();
        assert!(grid.vertical_lines(0.0, 600.0, 0.0).is_empty());
    }
}
