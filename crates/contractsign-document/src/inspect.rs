//! Page inspection.
//!
//! Reads page count and the first page's MediaBox, walking up the page tree
//! when the box is inherited.

use std::sync::Arc;

use contractsign_core::{
    DocumentError, DocumentPoint, DocumentRect, DocumentSize, RenderedDocument, ViewportSize,
};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Geometry of a loaded document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Number of pages
    pub page_count: u32,
    /// MediaBox of page 1; origin may be non-zero
    pub media_box: DocumentRect,
}

impl PageGeometry {
    /// Native size of page 1
    pub fn page_size(&self) -> DocumentSize {
        self.media_box.size
    }
}

/// Inspect document bytes
pub fn inspect(bytes: &[u8]) -> Result<PageGeometry, DocumentError> {
    let doc = load(bytes)?;
    let page_id = first_page(&doc)?;
    Ok(PageGeometry {
        page_count: doc.get_pages().len() as u32,
        media_box: media_box(&doc, page_id)?,
    })
}

/// Build the preview description for a document shown `render_width` pixels wide
///
/// The preview keeps the page's aspect ratio.
pub fn render_preview(
    bytes: impl Into<Arc<[u8]>>,
    render_width: f64,
) -> Result<RenderedDocument, DocumentError> {
    if !render_width.is_finite() || render_width <= 0.0 {
        return Err(DocumentError::Load {
            reason: format!("invalid preview width {}", render_width),
        });
    }
    let bytes = bytes.into();
    let geometry = inspect(&bytes)?;
    let page = geometry.page_size();
    let preview = ViewportSize::new(render_width, render_width * page.height / page.width);
    tracing::debug!(
        pages = geometry.page_count,
        page = %page,
        preview = %preview,
        "Document inspected"
    );
    Ok(RenderedDocument {
        bytes,
        page_count: geometry.page_count,
        page_size: page,
        preview_size: preview,
    })
}

pub(crate) fn load(bytes: &[u8]) -> Result<Document, DocumentError> {
    Document::load_mem(bytes).map_err(|e| DocumentError::Load {
        reason: e.to_string(),
    })
}

pub(crate) fn first_page(doc: &Document) -> Result<ObjectId, DocumentError> {
    doc.get_pages()
        .get(&1)
        .copied()
        .ok_or(DocumentError::MissingPage { page: 1 })
}

/// MediaBox of a page, inherited through `Parent`; A4 when none is declared
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Result<DocumentRect, DocumentError> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc.get_dictionary(id).map_err(|e| DocumentError::Load {
            reason: format!("page tree node {:?}: {}", id, e),
        })?;
        if let Some(rect) = extract_media_box(doc, dict) {
            return Ok(rect);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    tracing::warn!("No MediaBox in page tree, assuming A4");
    Ok(DocumentRect::new(DocumentPoint::default(), DocumentSize::A4))
}

fn extract_media_box(doc: &Document, dict: &Dictionary) -> Option<DocumentRect> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = resolved.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let llx = obj_to_f64(&arr[0])?;
    let lly = obj_to_f64(&arr[1])?;
    let urx = obj_to_f64(&arr[2])?;
    let ury = obj_to_f64(&arr[3])?;
    let size = DocumentSize::new((urx - llx).abs(), (ury - lly).abs());
    if !size.is_valid() {
        return None;
    }
    Some(DocumentRect::new(
        DocumentPoint::new(llx.min(urx), lly.min(ury)),
        size,
    ))
}

fn obj_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some((*f).into()),
        _ => None,
    }
}
