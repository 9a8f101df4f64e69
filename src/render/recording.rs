//! Test double that records draw calls.

use super::{Rgb, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { width: f32, height: f32 },
    Line { from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32 },
    Circle { center: (f32, f32), radius: f32, color: Rgb, alpha: f32 },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn lines(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }

    pub fn circles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color,
            alpha,
        });
    }

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }
}
