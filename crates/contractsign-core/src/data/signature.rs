//! Captured signature raster.

use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;

use crate::error::{CaptureError, EmbedError};

/// A captured signature, PNG-encoded with a transparent background
///
/// Lives only for the duration of a signing session; it is persisted
/// solely as part of the merged document.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl SignatureImage {
    /// Encode an RGBA buffer as PNG
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, CaptureError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| CaptureError::Encode {
                reason: e.to_string(),
            })?;
        Ok(Self {
            png,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Wrap already-encoded PNG bytes, reading dimensions from the header
    pub fn from_png(png: Vec<u8>) -> Result<Self, EmbedError> {
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).map_err(|e| {
            EmbedError::InvalidImage {
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            png,
        })
    }

    /// Encoded PNG bytes
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode back to straight-alpha RGBA
    pub fn decode(&self) -> Result<RgbaImage, EmbedError> {
        if self.png.is_empty() || self.width == 0 || self.height == 0 {
            return Err(EmbedError::EmptyImage);
        }
        image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map(|img| img.to_rgba8())
            .map_err(|e| EmbedError::InvalidImage {
                reason: e.to_string(),
            })
    }

    /// True when no pixel carries any ink
    ///
    /// Undecodable or zero-sized rasters count as blank.
    pub fn is_blank(&self) -> bool {
        match self.decode() {
            Ok(rgba) => rgba.pixels().all(|p| p[3] == 0),
            Err(_) => true,
        }
    }
}

impl fmt::Debug for SignatureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}
