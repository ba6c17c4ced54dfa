//! Signature merge.
//!
//! Stamps a signature raster onto page 1 as an image XObject with a soft
//! mask for transparency. The input bytes are only read; the result is a
//! freshly serialized, Flate-compressed document.

use contractsign_core::{DocumentError, DocumentRect, EmbedError, Error, SignatureImage};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::inspect::{first_page, load, media_box};

/// Prefix for the XObject names this module registers
const XOBJECT_PREFIX: &str = "Sig";

/// Merge `signature` into page 1 of `document` at `placement`
///
/// `placement` is in page units relative to the MediaBox origin. Identical
/// inputs produce byte-identical output.
pub fn merge(
    document: &[u8],
    signature: &SignatureImage,
    placement: &DocumentRect,
) -> Result<Vec<u8>, Error> {
    if !placement.size.is_valid()
        || !placement.origin.x.is_finite()
        || !placement.origin.y.is_finite()
    {
        return Err(EmbedError::InvalidPlacement {
            reason: format!("{}", placement),
        }
        .into());
    }

    let mut doc = load(document)?;
    let page_id = first_page(&doc)?;
    let page_box = media_box(&doc, page_id)?;

    let image_id = add_image(&mut doc, signature)?;
    let name = register_xobject(&mut doc, page_id, image_id)?;

    let x = page_box.origin.x + placement.origin.x;
    let y = page_box.origin.y + placement.origin.y;
    let stamp = format!(
        "\nQ\nq {} 0 0 {} {} {} cm /{} Do Q\n",
        fmt_num(placement.size.width),
        fmt_num(placement.size.height),
        fmt_num(x),
        fmt_num(y),
        name
    );
    isolate_and_append(&mut doc, page_id, stamp.into_bytes())?;
    doc.compress();

    let mut out = Vec::with_capacity(document.len() + signature.png().len() * 4);
    doc.save_to(&mut out).map_err(|e| DocumentError::Serialize {
        reason: e.to_string(),
    })?;

    tracing::debug!(
        xobject = %name,
        placement = %placement,
        input = document.len(),
        output = out.len(),
        "Signature merged"
    );
    Ok(out)
}

/// Add the raster as an RGB image with a DeviceGray soft mask
fn add_image(doc: &mut Document, signature: &SignatureImage) -> Result<ObjectId, EmbedError> {
    let img = signature.decode()?;
    if img.pixels().all(|p| p[3] == 0) {
        return Err(EmbedError::EmptyImage);
    }
    let (img_w, img_h) = img.dimensions();
    let mut rgb = Vec::with_capacity((img_w * img_h * 3) as usize);
    let mut alpha = Vec::with_capacity((img_w * img_h) as usize);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => img_w as i64,
            "Height" => img_h as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));

    Ok(doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => img_w as i64,
            "Height" => img_h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    )))
}

/// Wrap the page's existing content in `q`/`Q` and append `stamp` after it
///
/// Whatever graphics state the original content leaves behind is popped
/// before the stamp runs, so the stamp is drawn in default page space.
/// `stamp` must start with the closing `Q`.
fn isolate_and_append(
    doc: &mut Document,
    page_id: ObjectId,
    stamp: Vec<u8>,
) -> Result<(), DocumentError> {
    let original = match dictionary_at(doc, page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        Ok(_) => {
            return Err(DocumentError::Load {
                reason: "page contents are not a stream reference".to_string(),
            })
        }
        Err(_) => Vec::new(),
    };

    let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let close = doc.add_object(Stream::new(Dictionary::new(), stamp));

    let mut contents = Vec::with_capacity(original.len() + 2);
    contents.push(Object::Reference(open));
    contents.extend(original);
    contents.push(Object::Reference(close));

    doc.get_dictionary_mut(page_id)
        .map_err(|e| DocumentError::Load {
            reason: format!("page 1: {}", e),
        })?
        .set("Contents", contents);
    Ok(())
}

/// Register `image_id` in the page's XObject resources under an unused name
///
/// Resources and XObject dictionaries held by reference are updated in
/// place. Inherited resources are copied onto the page.
fn register_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
) -> Result<String, DocumentError> {
    let (resources_id, mut resources) = page_resources(doc, page_id)?;

    let (xobjects_id, mut xobjects) = match resources.get(b"XObject") {
        Ok(Object::Reference(id)) => (Some(*id), dictionary_at(doc, *id)?.clone()),
        Ok(Object::Dictionary(dict)) => (None, dict.clone()),
        Ok(_) => {
            return Err(DocumentError::Load {
                reason: "XObject resource is not a dictionary".to_string(),
            })
        }
        Err(_) => (None, Dictionary::new()),
    };

    let name = (1..)
        .map(|n| format!("{}{}", XOBJECT_PREFIX, n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| XOBJECT_PREFIX.to_string());
    xobjects.set(name.clone(), image_id);

    match xobjects_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(xobjects));
        }
        None => resources.set("XObject", xobjects),
    }
    match resources_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(resources));
        }
        None => {
            let page = doc
                .get_dictionary_mut(page_id)
                .map_err(|e| DocumentError::Load {
                    reason: format!("page 1: {}", e),
                })?;
            page.set("Resources", resources);
        }
    }
    Ok(name)
}

/// Resources in effect for a page, with the object id if they are indirect on the page itself
fn page_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<(Option<ObjectId>, Dictionary), DocumentError> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let node = dictionary_at(doc, id)?;
        match node.get(b"Resources") {
            Ok(Object::Reference(res_id)) => {
                let resources = dictionary_at(doc, *res_id)?.clone();
                let owned = if id == page_id { Some(*res_id) } else { None };
                return Ok((owned, resources));
            }
            Ok(Object::Dictionary(dict)) => return Ok((None, dict.clone())),
            _ => {}
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok((None, Dictionary::new()))
}

fn dictionary_at(doc: &Document, id: ObjectId) -> Result<&Dictionary, DocumentError> {
    doc.get_dictionary(id).map_err(|e| DocumentError::Load {
        reason: format!("object {:?}: {}", id, e),
    })
}

/// Content-stream number: at most four decimals, no trailing zeros
fn fmt_num(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
