//! `Surface` over a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Rgb, Surface};

/// 2D canvas backend.
///
/// Drawing calls that throw are swallowed; the first failure is logged.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    reported: bool,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            reported: false,
        }
    }

    /// Map CSS pixels onto a backing store scaled by `pixel_ratio`.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        let result = self
            .ctx
            .set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
        self.report(result);
    }

    fn report(&mut self, result: Result<(), JsValue>) {
        if let Err(err) = result {
            if !self.reported {
                self.reported = true;
                crate::console_warn!("canvas draw call failed: {:?}", err);
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0 as f64, from.1 as f64);
        self.ctx.line_to(to.0 as f64, to.1 as f64);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.css(alpha));
        self.ctx.stroke();
    }

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Rgb, alpha: f32) {
        self.ctx.begin_path();
        let result = self
            .ctx
            .arc(center.0 as f64, center.1 as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.report(result);
        self.ctx.set_fill_style_str(&color.css(alpha));
        self.ctx.fill();
    }
}
