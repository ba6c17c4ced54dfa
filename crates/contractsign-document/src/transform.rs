//! Preview to page coordinate transformation.
//!
//! The preview shows page 1 scaled to a fixed pixel width with (0,0) at the
//! top-left. The page itself is measured in points with (0,0) at the
//! bottom-left. Every conversion scales first and inverts the Y axis second,
//! always against the full page height.

use std::fmt;

use contractsign_core::{
    DocumentPoint, DocumentRect, DocumentSize, PlacementPoint, ViewportPoint, ViewportSize,
};

/// Mapping between the rendered preview and the native page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    preview: ViewportSize,
    page: DocumentSize,
    scale_x: f64,
    scale_y: f64,
}

impl PreviewTransform {
    /// Creates a transform for a preview of `preview` pixels showing a page of `page` units.
    ///
    /// Returns `None` when either size is zero, negative or non-finite.
    pub fn new(preview: ViewportSize, page: DocumentSize) -> Option<Self> {
        if !preview.is_valid() || !page.is_valid() {
            return None;
        }
        Some(Self {
            preview,
            page,
            scale_x: page.width / preview.width,
            scale_y: page.height / preview.height,
        })
    }

    /// Gets the preview size in pixels.
    pub fn preview_size(&self) -> ViewportSize {
        self.preview
    }

    /// Gets the native page size.
    pub fn page_size(&self) -> DocumentSize {
        self.page
    }

    /// Page units per preview pixel, `(x, y)`.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Whether a point lies on the rendered preview.
    pub fn contains(&self, point: ViewportPoint) -> bool {
        self.preview.contains(point)
    }

    /// Converts a single preview point to page coordinates.
    ///
    /// ```text
    /// doc_x = viewport_x * scale_x
    /// doc_y = page_height - viewport_y * scale_y
    /// ```
    pub fn to_document_point(&self, point: ViewportPoint) -> DocumentPoint {
        DocumentPoint::new(
            point.x * self.scale_x,
            self.page.height - point.y * self.scale_y,
        )
    }

    /// Converts a page point back to preview pixels.
    pub fn to_viewport_point(&self, point: DocumentPoint) -> ViewportPoint {
        ViewportPoint::new(
            point.x / self.scale_x,
            (self.page.height - point.y) / self.scale_y,
        )
    }

    /// Converts a placed box to the page rectangle that receives the image.
    ///
    /// The placement origin is the box's top-left corner; the result's origin
    /// is its bottom-left corner, so the box height is subtracted after the
    /// flip:
    ///
    /// ```text
    /// doc_w = box_w * scale_x
    /// doc_h = box_h * scale_y
    /// doc_y = page_height - viewport_y * scale_y - doc_h
    /// ```
    pub fn placement_to_document(&self, placement: &PlacementPoint) -> DocumentRect {
        let width = placement.size.width * self.scale_x;
        let height = placement.size.height * self.scale_y;
        let x = placement.origin.x * self.scale_x;
        let y = self.page.height - placement.origin.y * self.scale_y - height;
        DocumentRect::new(DocumentPoint::new(x, y), DocumentSize::new(width, height))
    }

    /// Inverse of [`placement_to_document`](Self::placement_to_document).
    pub fn document_to_viewport(&self, rect: &DocumentRect) -> PlacementPoint {
        let width = rect.size.width / self.scale_x;
        let height = rect.size.height / self.scale_y;
        let x = rect.origin.x / self.scale_x;
        let y = (self.page.height - rect.origin.y - rect.size.height) / self.scale_y;
        PlacementPoint::new(ViewportPoint::new(x, y), ViewportSize::new(width, height))
    }
}

impl fmt::Display for PreviewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (x{:.4}, x{:.4})",
            self.preview, self.page, self.scale_x, self.scale_y
        )
    }
}
