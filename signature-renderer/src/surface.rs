//! Drawing surfaces.
//!
//! [`render`](crate::render) talks to a [`Surface`] rather than a concrete
//! rasterizer, so hosts can draw into their own targets. [`RasterSurface`]
//! is the tiny-skia backed implementation used for export.

use signature_core::{Color, Point, StrokeSegment};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::error::{RenderError, RenderResult};

/// A target that stroke geometry can be drawn onto.
///
/// Sizes and coordinates are in view pixels.
pub trait Surface {
    /// Logical width in view pixels.
    fn width(&self) -> f32;

    /// Logical height in view pixels.
    fn height(&self) -> f32;

    /// Fill the whole surface with a solid color.
    fn fill(&mut self, color: Color);

    /// Clear the whole surface to zero alpha.
    fn clear(&mut self);

    /// Stroke one segment of a signature stroke.
    fn stroke_segment(&mut self, segment: &StrokeSegment);

    /// Stroke every segment of one signature stroke.
    ///
    /// Overlapping segment joints must not blend twice, so surfaces that
    /// support layers should composite translucent strokes as a whole.
    fn stroke_segments(&mut self, segments: &[StrokeSegment]) {
        for segment in segments {
            self.stroke_segment(segment);
        }
    }

    /// Draw a straight line.
    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color);
}

/// An offscreen tiny-skia pixmap.
///
/// `scale` maps view pixels to device pixels (e.g. 2.0 for retina output).
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
    scale: f32,
}

impl RasterSurface {
    /// Allocate a surface for a `width` x `height` view at the given scale.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the pixmap cannot be allocated
    /// (zero or overflowing dimensions) or the scale is not positive.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(width: u32, height: u32, scale: f32) -> RenderResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::Surface(format!("invalid scale {scale}")));
        }
        let px_w = (width as f32 * scale).round() as u32;
        let px_h = (height as f32 * scale).round() as u32;
        let pixmap = Pixmap::new(px_w, px_h).ok_or_else(|| {
            RenderError::Surface(format!("Failed to create {px_w}x{px_h} pixmap"))
        })?;
        Ok(Self { pixmap, scale })
    }

    /// Device pixel width.
    #[must_use]
    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Device pixel height.
    #[must_use]
    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The underlying pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the surface, returning the pixmap.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    fn stroke_path(&mut self, builder: PathBuilder, width: f32, color: Color) {
        let transform = self.transform();
        stroke_onto(&mut self.pixmap, builder, width, color, transform);
    }

    /// Draw a translucent stroke opaquely on a scratch layer, then composite
    /// the layer once at the stroke's alpha.
    fn stroke_layered(&mut self, segments: &[StrokeSegment], color: Color) -> bool {
        let Some(mut layer) = Pixmap::new(self.pixmap.width(), self.pixmap.height()) else {
            return false;
        };
        let opaque = Color { a: 255, ..color };
        let transform = self.transform();
        for segment in segments {
            stroke_onto(&mut layer, segment_path(segment), segment.width, opaque, transform);
        }

        let paint = PixmapPaint {
            opacity: f32::from(color.a) / 255.0,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
        true
    }
}

fn segment_path(segment: &StrokeSegment) -> PathBuilder {
    let mut builder = PathBuilder::new();
    builder.move_to(segment.from.x, segment.from.y);
    match segment.control {
        Some(control) => builder.quad_to(control.x, control.y, segment.to.x, segment.to.y),
        None => builder.line_to(segment.to.x, segment.to.y),
    }
    builder
}

fn stroke_onto(
    pixmap: &mut Pixmap,
    builder: PathBuilder,
    width: f32,
    color: Color,
    transform: Transform,
) {
    // Degenerate paths (e.g. a bare move) have nothing to stroke.
    let Some(path) = builder.finish() else {
        tracing::trace!("Skipping degenerate path");
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    let stroke = tiny_skia::Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };

    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}

fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

impl Surface for RasterSurface {
    #[allow(clippy::cast_precision_loss)]
    fn width(&self) -> f32 {
        self.pixmap.width() as f32 / self.scale
    }

    #[allow(clippy::cast_precision_loss)]
    fn height(&self) -> f32 {
        self.pixmap.height() as f32 / self.scale
    }

    fn fill(&mut self, color: Color) {
        self.pixmap.fill(to_skia(color));
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_segment(&mut self, segment: &StrokeSegment) {
        self.stroke_path(segment_path(segment), segment.width, segment.color);
    }

    fn stroke_segments(&mut self, segments: &[StrokeSegment]) {
        let Some(first) = segments.first() else {
            return;
        };
        let color = first.color;
        let uniform = segments.iter().all(|segment| segment.color == color);
        if !color.is_opaque() && uniform && self.stroke_layered(segments, color) {
            return;
        }
        for segment in segments {
            self.stroke_segment(segment);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        self.stroke_path(builder, width, color);
    }
}
