//! Raster surface the roots are drawn onto.
//!
//! [`Surface`] wraps a `tiny_skia::Pixmap` owned by the simulation. It never
//! clears between frames; the trail effect comes from [`Canvas::fade`]
//! washing everything a little closer to white each frame.
//!
//! Strokes are given in logical units. A scale above one renders them onto
//! a denser pixmap, so the picture stays sharp on high-DPI displays.

use glam::Vec2;
use tiny_skia::{
    Color, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A cubic Bézier stroke with a constant width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveStroke {
    pub from: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: [u8; 3],
}

/// Drawing operations the simulation needs from a surface.
pub trait Canvas {
    /// Paints white at opacity `alpha` over the whole canvas.
    fn fade(&mut self, alpha: f32);

    fn stroke_curve(&mut self, stroke: &CurveStroke);
}

/// White, fully opaque surface of the given size.
///
/// `None` when a side is zero or too large for tiny-skia.
fn white_pixmap(width: usize, height: usize) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(u32::try_from(width).ok()?, u32::try_from(height).ok()?)?;
    pixmap.fill(Color::WHITE);
    Some(pixmap)
}

#[derive(Clone, Debug)]
pub struct Surface {
    // Empty surfaces have no pixmap.
    pixmap: Option<Pixmap>,
    /// Pixels per logical unit.
    scale: f32,
}

impl Surface {
    /// Creates a white surface of `width` x `height` pixels at scale 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixmap: white_pixmap(width, height),
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets how many pixels one logical unit covers.
    ///
    /// Non-finite or non-positive values are ignored. Existing pixels are
    /// left as they are.
    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn width(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| p.width() as usize)
    }

    pub fn height(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| p.height() as usize)
    }

    /// Size in logical units, the space strokes and spawn points live in.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32) / self.scale
    }

    /// Row-major RGBA bytes, ready for texture upload.
    ///
    /// The pixmap stores premultiplied colour, but every pixel is opaque so
    /// the bytes are also valid unmultiplied RGBA.
    pub fn as_rgba(&self) -> &[u8] {
        self.pixmap.as_ref().map(|p| p.data()).unwrap_or(&[])
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        let c = pixmap.pixel(u32::try_from(x).ok()?, u32::try_from(y).ok()?)?;
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::WHITE);
        }
    }

    /// Changes the surface size, keeping the overlapping top-left region.
    ///
    /// Newly exposed pixels are white. Existing content is not rescaled.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width() && height == self.height() {
            return;
        }

        let mut resized = white_pixmap(width, height);
        if let (Some(dst), Some(src)) = (&mut resized, &self.pixmap) {
            dst.draw_pixmap(
                0,
                0,
                src.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        self.pixmap = resized;
    }
}

impl Canvas for Surface {
    fn fade(&mut self, alpha: f32) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        if alpha == 0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32)
        else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, alpha);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn stroke_curve(&mut self, stroke: &CurveStroke) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        // tiny-skia treats a zero width as a hairline.
        if stroke.width <= 0.0 {
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(stroke.from.x, stroke.from.y);
        pb.cubic_to(
            stroke.ctrl1.x,
            stroke.ctrl1.y,
            stroke.ctrl2.x,
            stroke.ctrl2.y,
            stroke.to.x,
            stroke.to.y,
        );
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b] = stroke.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        let style = Stroke {
            width: stroke.width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        let transform = Transform::from_scale(self.scale, self.scale);
        pixmap.stroke_path(&path, &paint, &style, transform, None);
    }
}

/// Canvas that only records what was drawn.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct StrokeLog {
    pub strokes: Vec<CurveStroke>,
    pub fades: Vec<f32>,
}

#[cfg(test)]
impl Canvas for StrokeLog {
    fn fade(&mut self, alpha: f32) {
        self.fades.push(alpha);
    }

    fn stroke_curve(&mut self, stroke: &CurveStroke) {
        self.strokes.push(*stroke);
    }
}
