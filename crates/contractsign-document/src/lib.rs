//! # ContractSign Document
//!
//! Everything that touches the document's own coordinate space: the preview
//! transform from viewport pixels to page units, page inspection, and the
//! merge that stamps a signature raster onto page 1.

pub mod blank;
pub mod inspect;
pub mod merge;
pub mod transform;

pub use blank::blank_document;
pub use inspect::{inspect, render_preview, PageGeometry};
pub use merge::merge;
pub use transform::PreviewTransform;
