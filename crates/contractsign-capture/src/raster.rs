//! Stroke rasterizer
//!
//! Renders strokes onto a transparent pixmap using tiny-skia for
//! anti-aliased output, then converts to a straight-alpha RGBA image.

use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke as SkStroke, Transform};

use crate::pointer::Stroke;

/// Pen used to draw strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    /// Line width in pixels.
    pub width: f32,
    /// Straight-alpha RGBA ink colour.
    pub color: [u8; 4],
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 3.0,
            color: [17, 24, 39, 255],
        }
    }
}

/// Render strokes to a `width` x `height` RGBA image with a transparent background
pub fn rasterize(strokes: &[Stroke], width: u32, height: u32, pen: &Pen) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return RgbaImage::new(width, height);
    };

    let mut paint = Paint::default();
    let [r, g, b, a] = pen.color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let line = SkStroke {
        width: pen.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };

    for stroke in strokes {
        let points = stroke.points();
        if stroke.is_dot() {
            let (x, y) = points[0];
            if let Some(dot) = PathBuilder::from_circle(x, y, (pen.width / 2.0).max(0.5)) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            continue;
        }

        let mut pb = PathBuilder::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &line, Transform::identity(), None);
        }
    }

    let mut image = RgbaImage::new(width, height);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
