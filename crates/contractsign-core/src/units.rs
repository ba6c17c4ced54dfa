//! Coordinate units
//!
//! Viewport quantities are screen pixels relative to the rendered preview,
//! with the origin at the top-left and Y growing downward. Document
//! quantities are page units (PDF points) with the origin at the bottom-left
//! and Y growing upward. The two families are separate types so a value
//! cannot cross from one space to the other without an explicit transform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the rendered preview, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportPoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl ViewportPoint {
    /// Create a new viewport point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ViewportPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}px, {:.1}px)", self.x, self.y)
    }
}

/// A size on the rendered preview, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ViewportSize {
    /// Create a new viewport size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Check whether a point lies inside `[0, width) x [0, height)`
    pub fn contains(&self, point: ViewportPoint) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x{:.1}px", self.width, self.height)
    }
}

/// A point on a document page, in page units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentPoint {
    /// Units from the left edge of the page.
    pub x: f64,
    /// Units from the bottom edge of the page.
    pub y: f64,
}

impl DocumentPoint {
    /// Create a new document point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for DocumentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}pt, {:.2}pt)", self.x, self.y)
    }
}

/// A size on a document page, in page units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentSize {
    /// Width in page units.
    pub width: f64,
    /// Height in page units.
    pub height: f64,
}

impl DocumentSize {
    /// ISO A4 portrait in PDF points
    pub const A4: DocumentSize = DocumentSize {
        width: 595.0,
        height: 842.0,
    };

    /// Create a new document size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl fmt::Display for DocumentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x{:.2}pt", self.width, self.height)
    }
}

/// A rectangle on a document page; `origin` is its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentRect {
    /// Bottom-left corner.
    pub origin: DocumentPoint,
    /// Extent.
    pub size: DocumentSize,
}

impl DocumentRect {
    /// Create a new document rectangle
    pub fn new(origin: DocumentPoint, size: DocumentSize) -> Self {
        Self { origin, size }
    }
}

impl fmt::Display for DocumentRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.size)
    }
}

/// Where the user dropped the signature box on the preview
///
/// `origin` is the clicked point and the top-left corner of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPoint {
    /// Top-left corner of the box.
    pub origin: ViewportPoint,
    /// Box extent in pixels.
    pub size: ViewportSize,
}

impl PlacementPoint {
    /// Create a placement
    pub fn new(origin: ViewportPoint, size: ViewportSize) -> Self {
        Self { origin, size }
    }
}

impl fmt::Display for PlacementPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.size)
    }
}
