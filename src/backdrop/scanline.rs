//! ScanlineEmitter - a few bright horizontal lines sweeping down the canvas.

use std::ops::Range;

use rand::Rng;

/// Number of lines in the pool.
pub const POOL_SIZE: usize = 3;
/// Distance below the bottom edge a line travels before respawning.
pub const RESPAWN_MARGIN: f32 = 20.0;

const SPEED: Range<f32> = 0.4..1.6;
const OPACITY: Range<f32> = 0.04..0.16;
const WIDTH: Range<f32> = 1.0..3.0;
/// Respawn height; always above the top edge so lines slide in.
const RESPAWN_Y: Range<f32> = -40.0..-5.0;

/// One moving line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scanline {
    /// Vertical position, CSS px.
    pub y: f32,
    /// Pixels per frame.
    pub speed: f32,
    pub opacity: f32,
    /// Stroke thickness, CSS px.
    pub width: f32,
}

impl Scanline {
    fn random(y: f32, rng: &mut impl Rng) -> Self {
        Self {
            y,
            speed: rng.gen_range(SPEED),
            opacity: rng.gen_range(OPACITY),
            width: rng.gen_range(WIDTH),
        }
    }
}

/// Fixed pool of scanlines.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanlineEmitter {
    lines: Vec<Scanline>,
}

impl ScanlineEmitter {
    /// Scatter the pool over a canvas of the given height.
    pub fn new(height: f32, rng: &mut impl Rng) -> Self {
        let lines = (0..POOL_SIZE)
            .map(|_| {
                let y = if height > 0.0 {
                    rng.gen_range(0.0..height)
                } else {
                    0.0
                };
                Scanline::random(y, rng)
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Scanline] {
        &self.lines
    }

    /// Advance every line one frame, respawning those past the bottom.
    pub fn step(&mut self, height: f32, rng: &mut impl Rng) {
        let limit = height + RESPAWN_MARGIN;
        for line in &mut self.lines {
            line.y += line.speed;
            if line.y > limit {
                *line = Scanline::random(rng.gen_range(RESPAWN_Y), rng);
            }
        }
    }
}
