//! Scan-grid backdrop: perspective floor grid, sweeping scanlines and
//! correlation flashes. All coordinates are CSS pixels.

pub mod flash;
pub mod perspective;
pub mod scanline;

pub use flash::{CorrelationFlashScheduler, FlashEvent, FlashTiming};
pub use perspective::{GridLine, GridStyle, PerspectiveGrid};
pub use scanline::{Scanline, ScanlineEmitter};
