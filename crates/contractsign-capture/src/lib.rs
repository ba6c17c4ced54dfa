//! # ContractSign Capture
//!
//! Free-hand signature capture: pointer tracking on a fixed-size surface,
//! slide-to-confirm gating, and rasterization to a transparent PNG.

pub mod gesture;
pub mod pointer;
pub mod raster;
pub mod surface;

pub use gesture::{ConfirmGesture, GestureUpdate};
pub use pointer::{PointerEvent, PointerKind, PointerPhase, Stroke};
pub use raster::{rasterize, Pen};
pub use surface::{CaptureOutcome, CaptureSurface, SurfaceConfig};
