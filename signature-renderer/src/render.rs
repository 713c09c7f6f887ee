//! Canvas rendering.

use serde::{Deserialize, Serialize};
use signature_core::{BackgroundMode, Color, Point, SignatureCanvas, BASELINE_POSITION};

use crate::surface::Surface;

/// Appearance of the baseline guide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStyle {
    /// Guide color.
    pub color: Color,
    /// Line width in view pixels.
    pub width: f32,
    /// Gap left free at each side of the view.
    pub margin: f32,
}

impl Default for BaselineStyle {
    fn default() -> Self {
        Self {
            color: Color::GUIDE_GRAY,
            width: 1.0,
            margin: 40.0,
        }
    }
}

/// Options for a single render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Background fill policy.
    pub background_mode: BackgroundMode,
    /// Fill color for [`BackgroundMode::Opaque`].
    pub background_color: Color,
    /// Whether to draw the baseline guide.
    pub show_baseline: bool,
    /// Baseline guide appearance.
    pub baseline: BaselineStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background_mode: BackgroundMode::Opaque,
            background_color: Color::WHITE,
            show_baseline: false,
            baseline: BaselineStyle::default(),
        }
    }
}

impl RenderOptions {
    /// Options matching a canvas's own configuration.
    #[must_use]
    pub fn from_canvas(canvas: &SignatureCanvas) -> Self {
        let config = canvas.config();
        Self {
            background_mode: config.background_mode,
            background_color: config.background_color,
            show_baseline: config.show_baseline,
            baseline: BaselineStyle::default(),
        }
    }

    /// Same options with a different background mode.
    #[must_use]
    pub fn with_background_mode(mut self, mode: BackgroundMode) -> Self {
        self.background_mode = mode;
        self
    }
}

/// Draw a canvas onto a surface.
///
/// Fills the background, draws the baseline guide if enabled, then every
/// finalized stroke in insertion order and the active stroke on top. Only
/// reads the canvas; identical state and options give identical output.
pub fn render<S: Surface + ?Sized>(
    canvas: &SignatureCanvas,
    surface: &mut S,
    options: &RenderOptions,
) {
    match options.background_mode {
        BackgroundMode::Opaque => surface.fill(options.background_color),
        BackgroundMode::Transparent => surface.clear(),
    }

    if options.show_baseline {
        draw_baseline(surface, &options.baseline);
    }

    let mut segment_count = 0_usize;
    for stroke in canvas.all_strokes() {
        let segments = stroke.segments();
        surface.stroke_segments(&segments);
        segment_count += segments.len();
    }

    tracing::trace!(
        "Rendered {} strokes ({segment_count} segments) onto {}x{} surface",
        canvas.stroke_count(),
        surface.width(),
        surface.height()
    );
}

fn draw_baseline<S: Surface + ?Sized>(surface: &mut S, style: &BaselineStyle) {
    let y = surface.height() * BASELINE_POSITION;
    let left = style.margin;
    let right = surface.width() - style.margin;
    if right <= left {
        return;
    }
    surface.draw_line(Point::new(left, y), Point::new(right, y), style.width, style.color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use signature_core::StrokeSegment;

    /// Records draw calls instead of rasterizing.
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        Fill(Color),
        Clear,
        Segment(StrokeSegment),
        Line(Point, Point),
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f32 {
            300.0
        }

        fn height(&self) -> f32 {
            100.0
        }

        fn fill(&mut self, color: Color) {
            self.calls.push(Call::Fill(color));
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn stroke_segment(&mut self, segment: &StrokeSegment) {
            self.calls.push(Call::Segment(*segment));
        }

        fn draw_line(&mut self, from: Point, to: Point, _width: f32, _color: Color) {
            self.calls.push(Call::Line(from, to));
        }
    }

    fn canvas_with_two_strokes() -> SignatureCanvas {
        let mut canvas = SignatureCanvas::new(300.0, 100.0);
        canvas.begin(Point::new(10.0, 10.0), None);
        canvas.extend(Point::new(18.0, 12.0), None);
        canvas.end();
        canvas.set_stroke_color(Color::rgb(255, 0, 0));
        canvas.begin(Point::new(50.0, 50.0), None);
        canvas.extend(Point::new(58.0, 52.0), None);
        canvas
    }

    #[test]
    fn test_background_modes() {
        let canvas = SignatureCanvas::new(300.0, 100.0);

        let mut opaque = RecordingSurface::default();
        render(&canvas, &mut opaque, &RenderOptions::default());
        assert_eq!(opaque.calls, vec![Call::Fill(Color::WHITE)]);

        let mut transparent = RecordingSurface::default();
        let options = RenderOptions::default().with_background_mode(BackgroundMode::Transparent);
        render(&canvas, &mut transparent, &options);
        assert_eq!(transparent.calls, vec![Call::Clear]);
    }

    #[test]
    fn test_baseline_position() {
        let canvas = SignatureCanvas::new(300.0, 100.0);
        let mut surface = RecordingSurface::default();
        let options = RenderOptions {
            show_baseline: true,
            ..RenderOptions::default()
        };
        render(&canvas, &mut surface, &options);
        assert_eq!(
            surface.calls[1],
            Call::Line(Point::new(40.0, 70.0), Point::new(260.0, 70.0))
        );
    }

    #[test]
    fn test_strokes_drawn_in_order_active_last() {
        let canvas = canvas_with_two_strokes();
        let mut surface = RecordingSurface::default();
        render(&canvas, &mut surface, &RenderOptions::from_canvas(&canvas));

        let colors: Vec<Color> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Segment(s) => Some(s.color),
                _ => None,
            })
            .collect();
        assert!(!colors.is_empty());
        let first_red = colors
            .iter()
            .position(|&c| c == Color::rgb(255, 0, 0))
            .expect("active stroke drawn");
        assert!(colors[..first_red].iter().all(|&c| c == Color::BLACK));
        assert!(colors[first_red..].iter().all(|&c| c == Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_single_tap_draws_nothing() {
        let mut canvas = SignatureCanvas::new(300.0, 100.0);
        canvas.begin(Point::new(10.0, 10.0), None);
        canvas.end();

        let mut surface = RecordingSurface::default();
        render(&canvas, &mut surface, &RenderOptions::default());
        assert_eq!(surface.calls, vec![Call::Fill(Color::WHITE)]);
    }

    #[test]
    fn test_render_does_not_mutate_canvas() {
        let canvas = canvas_with_two_strokes();
        let before = canvas.strokes().to_vec();
        let mut first = RecordingSurface::default();
        let mut second = RecordingSurface::default();
        render(&canvas, &mut first, &RenderOptions::default());
        render(&canvas, &mut second, &RenderOptions::default());
        assert_eq!(first.calls, second.calls);
        assert_eq!(canvas.strokes(), before.as_slice());
    }
}
