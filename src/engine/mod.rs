//! Engine - composes the layers into a scene and runs it in the browser.
//!
//! - `scene`: pure per-frame update and draw of every enabled layer
//! - `runtime`: canvas, DOM listeners and the requestAnimationFrame loop

mod runtime;
pub mod scene;

pub use runtime::RenderLoop;
pub use scene::{FrameInput, Scene, Viewport};
