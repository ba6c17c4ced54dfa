//! Blank document builder.
//!
//! Produces a minimal multi-page document with an inherited MediaBox and an
//! empty content stream per page. Used for fixtures and the demo driver.

use contractsign_core::{DocumentError, DocumentSize};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a document of `pages` empty pages of the given size
pub fn blank_document(size: DocumentSize, pages: u32) -> Result<Vec<u8>, DocumentError> {
    if !size.is_valid() || pages == 0 {
        return Err(DocumentError::Serialize {
            reason: format!("cannot build {} page(s) of {}", pages, size),
        });
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {},
            });
            page_id.into()
        })
        .collect();

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "MediaBox" => vec![0.into(), 0.into(), number(size.width), number(size.height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| DocumentError::Serialize {
        reason: e.to_string(),
    })?;
    Ok(out)
}

pub(crate) fn number(value: f64) -> Object {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as _)
    }
}
