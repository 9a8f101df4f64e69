//! Drawing backends.
//!
//! The scene draws through the `Surface` trait so it can be exercised
//! without a browser. `CanvasSurface` is the 2D-canvas implementation.

mod canvas;
mod color;
#[cfg(test)]
pub mod recording;

pub use canvas::CanvasSurface;
pub use color::Rgb;

/// Minimal immediate-mode drawing target. Coordinates are CSS pixels.
pub trait Surface {
    /// Erase the whole `width` x `height` area.
    fn clear(&mut self, width: f32, height: f32);

    /// Stroke a straight segment.
    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32);

    /// Fill a circle.
    fn circle(&mut self, center: (f32, f32), radius: f32, color: Rgb, alpha: f32);
}
