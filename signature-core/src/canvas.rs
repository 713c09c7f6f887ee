//! Signature canvas state and stroke capture.

use serde::{Deserialize, Serialize};

use crate::smoothing::{SmoothingConfig, SmoothingState};
use crate::{
    Color, InputEvent, Point, PointerEvent, PointerPhase, Sample, SignatureResult, Stroke,
    Vertex,
};

/// Vertical position of the baseline guide, as a fraction of view height.
pub const BASELINE_POSITION: f32 = 0.7;

/// Default base stroke width in pixels.
pub const DEFAULT_BASE_WIDTH: f32 = 6.0;

/// How the background is filled when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Fill with the solid background color (formats without alpha).
    #[default]
    Opaque,
    /// Clear to zero alpha (formats with alpha).
    Transparent,
}

/// Canvas-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Base stroke width; resolved widths range around this.
    pub base_width: f32,
    /// Color applied to new strokes.
    pub stroke_color: Color,
    /// Fill color for opaque backgrounds.
    pub background_color: Color,
    /// Background fill policy.
    pub background_mode: BackgroundMode,
    /// Whether the baseline guide is drawn.
    pub show_baseline: bool,
    /// Smoothing constants.
    pub smoothing: SmoothingConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_width: DEFAULT_BASE_WIDTH,
            stroke_color: Color::BLACK,
            background_color: Color::WHITE,
            background_mode: BackgroundMode::Opaque,
            show_baseline: false,
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Check the base width and smoothing constants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignatureError::InvalidConfig`] naming the first bad
    /// value.
    pub fn validate(&self) -> SignatureResult<()> {
        validate_base_width(self.base_width)?;
        self.smoothing.validate()
    }
}

fn validate_base_width(width: f32) -> SignatureResult<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(crate::SignatureError::InvalidConfig(format!(
            "stroke width must be positive, got {width}"
        )));
    }
    Ok(())
}

/// The stroke currently being drawn, with its filter state.
#[derive(Debug, Clone)]
struct ActiveStroke {
    stroke: Stroke,
    smoothing: SmoothingState,
}

/// All strokes for one signature view.
///
/// Finalized strokes are kept in insertion order, which is also draw order.
/// At most one stroke is active (between pointer-down and pointer-up).
#[derive(Debug, Clone)]
pub struct SignatureCanvas {
    config: CanvasConfig,
    width: f32,
    height: f32,
    strokes: Vec<Stroke>,
    active: Option<ActiveStroke>,
}

impl SignatureCanvas {
    /// Create an empty canvas with the given view size and default config.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            config: CanvasConfig::default(),
            width,
            height,
            strokes: Vec::new(),
            active: None,
        }
    }

    /// Create an empty canvas with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignatureError::InvalidConfig`] if the base width or
    /// any smoothing constant is out of range.
    pub fn with_config(width: f32, height: f32, config: CanvasConfig) -> SignatureResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(width, height)
        })
    }

    // -----------------------------------------------------------------------
    // Capture
    // -----------------------------------------------------------------------

    /// Start a new stroke at `point`.
    ///
    /// A stroke still active from a lost pointer-up is finalized first.
    pub fn begin(&mut self, point: Point, pressure: Option<f32>) {
        if self.active.is_some() {
            tracing::debug!("Pointer-down while a stroke is active; finalizing it");
            self.end();
        }

        let base_width = self.config.base_width;
        let stroke = Stroke::new(Vertex::new(point, base_width), self.config.stroke_color);
        tracing::debug!(
            "Stroke {} started at ({}, {}) pressure={:?}",
            stroke.id,
            point.x,
            point.y,
            pressure
        );
        self.active = Some(ActiveStroke {
            stroke,
            smoothing: SmoothingState::new(point, base_width),
        });
    }

    /// Extend the active stroke towards `point`.
    ///
    /// No-op without an active stroke, or when `point` is within the
    /// coalescing distance of the last recorded position.
    pub fn extend(&mut self, point: Point, pressure: Option<f32>) {
        let Some(active) = self.active.as_mut() else {
            tracing::trace!("Pointer-move without an active stroke ignored");
            return;
        };

        let Some(sample) = active.smoothing.advance(
            point,
            pressure,
            self.config.base_width,
            &self.config.smoothing,
        ) else {
            return;
        };

        for interpolated in sample.interpolated {
            active.stroke.push(Vertex::new(interpolated, sample.width));
        }
        active.stroke.push(Vertex::new(sample.point, sample.width));
    }

    /// Finalize the active stroke.
    ///
    /// Strokes with at least two vertices get a tapering end vertex at the
    /// minimum width. No-op without an active stroke.
    pub fn end(&mut self) {
        let Some(ActiveStroke { mut stroke, .. }) = self.active.take() else {
            return;
        };

        if stroke.is_drawable() {
            if let Some(last) = stroke.last().copied() {
                stroke.push(Vertex::new(last.point, self.min_width()));
            }
        }

        tracing::debug!(
            "Stroke {} finalized with {} vertices",
            stroke.id,
            stroke.len()
        );
        self.strokes.push(stroke);
    }

    /// Discard every finalized stroke and any active stroke.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} strokes", self.stroke_count());
        self.strokes.clear();
        self.active = None;
    }

    /// Whether nothing has been recorded.
    ///
    /// Counts strokes, not visible pixels: a single tap makes the canvas
    /// non-empty even though it draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.active.is_none()
    }

    /// Dispatch a host event or command.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration commands with bad values
    /// (an unparseable color or a non-positive width). Pointer events and
    /// `Clear` never fail.
    pub fn process_event(&mut self, event: &InputEvent) -> SignatureResult<()> {
        match event {
            InputEvent::Pointer(pointer) => self.process_pointer(pointer),
            InputEvent::Clear => self.clear(),
            InputEvent::SetStrokeColor { color } => {
                self.set_stroke_color_str(color)?;
            }
            InputEvent::SetStrokeWidth { width } => self.set_base_width(*width)?,
            InputEvent::SetShowBaseline { visible } => self.set_show_baseline(*visible),
            InputEvent::SetBackgroundMode { mode } => self.set_background_mode(*mode),
        }
        Ok(())
    }

    fn process_pointer(&mut self, event: &PointerEvent) {
        let Sample { point, pressure } = event.sample();
        match event.phase {
            PointerPhase::Down => self.begin(point, pressure),
            PointerPhase::Move => self.extend(point, pressure),
            PointerPhase::Up => self.end(),
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Set the color for strokes started from now on.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.config.stroke_color = color;
    }

    /// Set the stroke color from a name or hex literal.
    ///
    /// On failure the previous color is kept.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignatureError::UnparseableColor`] if the string is
    /// not a recognized color.
    pub fn set_stroke_color_str(&mut self, color: &str) -> SignatureResult<Color> {
        match Color::parse(color) {
            Ok(parsed) => {
                self.config.stroke_color = parsed;
                Ok(parsed)
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid color format {color:?}, keeping {}",
                    self.config.stroke_color
                );
                Err(e)
            }
        }
    }

    /// Set the base stroke width.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignatureError::InvalidConfig`] unless `width` is a
    /// positive finite number.
    pub fn set_base_width(&mut self, width: f32) -> SignatureResult<()> {
        validate_base_width(width)?;
        self.config.base_width = width;
        Ok(())
    }

    /// Set the background fill color used in opaque mode.
    pub fn set_background_color(&mut self, color: Color) {
        self.config.background_color = color;
    }

    /// Set the background fill policy.
    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.config.background_mode = mode;
    }

    /// Show or hide the baseline guide.
    pub fn set_show_baseline(&mut self, visible: bool) {
        self.config.show_baseline = visible;
    }

    /// Replace the smoothing constants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignatureError::InvalidConfig`] if any constant is out
    /// of range; the previous constants stay in effect.
    pub fn set_smoothing(&mut self, smoothing: SmoothingConfig) -> SignatureResult<()> {
        smoothing.validate()?;
        self.config.smoothing = smoothing;
        Ok(())
    }

    /// Update the view size (after layout changes).
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// View size `(width, height)` in pixels.
    #[must_use]
    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Y coordinate of the baseline guide.
    #[must_use]
    pub fn baseline_y(&self) -> f32 {
        self.height * BASELINE_POSITION
    }

    /// Minimum resolved width for the current base width.
    #[must_use]
    pub fn min_width(&self) -> f32 {
        self.config.smoothing.min_width(self.config.base_width)
    }

    /// Maximum resolved width for the current base width.
    #[must_use]
    pub fn max_width(&self) -> f32 {
        self.config.smoothing.max_width(self.config.base_width)
    }

    /// Finalized strokes in draw order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke being drawn, if any.
    #[must_use]
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref().map(|a| &a.stroke)
    }

    /// Smoothing state of the active stroke, if any.
    #[must_use]
    pub fn smoothing_state(&self) -> Option<&SmoothingState> {
        self.active.as_ref().map(|a| &a.smoothing)
    }

    /// Every stroke in draw order: finalized strokes, then the active one.
    pub fn all_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.active_stroke())
    }

    /// Number of recorded strokes, including the active one.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len() + usize::from(self.active.is_some())
    }
}

impl Default for SignatureCanvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignatureError;

    fn drag(canvas: &mut SignatureCanvas, points: &[(f32, f32)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            canvas.begin(Point::new(x, y), None);
        }
        for &(x, y) in iter {
            canvas.extend(Point::new(x, y), None);
        }
        canvas.end();
    }

    #[test]
    fn test_new_canvas_is_empty() {
        let canvas = SignatureCanvas::new(400.0, 200.0);
        assert!(canvas.is_empty());
        assert_eq!(canvas.stroke_count(), 0);
        assert!(canvas.active_stroke().is_none());
    }

    #[test]
    fn test_begin_creates_single_vertex_stroke() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(10.0, 10.0), Some(0.5));

        let stroke = canvas.active_stroke().expect("active");
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.vertices()[0].point, Point::new(10.0, 10.0));
        assert!((stroke.vertices()[0].width - DEFAULT_BASE_WIDTH).abs() < f32::EPSILON);
        assert!(!canvas.is_empty());

        let state = canvas.smoothing_state().expect("smoothing");
        assert_eq!(state.velocity(), (0.0, 0.0));
        assert_eq!(state.last_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_single_tap_keeps_one_vertex() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(10.0, 10.0), None);
        canvas.end();

        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.strokes()[0].len(), 1);
        assert!(canvas.active_stroke().is_none());
        assert!(!canvas.is_empty());
    }

    #[test]
    fn test_end_appends_taper_vertex() {
        let mut canvas = SignatureCanvas::default();
        drag(&mut canvas, &[(0.0, 0.0), (5.0, 0.0), (9.0, 2.0)]);

        let stroke = &canvas.strokes()[0];
        let vertices = stroke.vertices();
        let last = vertices[vertices.len() - 1];
        let before = vertices[vertices.len() - 2];
        assert_eq!(last.point, before.point);
        assert!((last.width - canvas.min_width()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_extend_without_active_stroke_is_noop() {
        let mut canvas = SignatureCanvas::default();
        canvas.extend(Point::new(50.0, 50.0), None);
        canvas.end();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_extend_grows_stroke_monotonically() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), None);
        let mut previous = 1;
        for i in 1_u8..=30 {
            let x = f32::from(i) * 3.0;
            canvas.extend(Point::new(x, (x / 10.0).sin() * 5.0), None);
            let len = canvas.active_stroke().expect("active").len();
            assert!(len > previous, "vertex count must grow on every move");
            previous = len;
        }
    }

    #[test]
    fn test_duplicate_moves_are_coalesced() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), None);
        canvas.extend(Point::new(5.0, 0.0), None);
        canvas.extend(Point::new(5.0, 0.0), None);
        assert_eq!(canvas.active_stroke().expect("active").len(), 2);
    }

    #[test]
    fn test_straight_drag_is_interpolated() {
        let mut canvas = SignatureCanvas::default();
        drag(&mut canvas, &[(0.0, 0.0), (100.0, 0.0)]);

        let stroke = &canvas.strokes()[0];
        // origin + 20 interpolated + sample + taper
        assert_eq!(stroke.len(), 23);
        assert!(stroke.vertices().iter().all(|v| v.point.y.abs() < 1e-4));
        let inner = &stroke.vertices()[1..21];
        assert!(inner.iter().all(|v| v.point.x > 0.0 && v.point.x < 100.0));
    }

    #[test]
    fn test_resolved_widths_within_bounds() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), Some(1.0));
        let moves = [(300.0, 10.0), (305.0, 12.0), (0.0, 400.0), (2.0, 402.0)];
        for (x, y) in moves {
            canvas.extend(Point::new(x, y), Some(0.05));
        }
        let (min, max) = (canvas.min_width(), canvas.max_width());
        let stroke = canvas.active_stroke().expect("active");
        assert!(stroke
            .vertices()
            .iter()
            .all(|v| v.width >= min && v.width <= max));
    }

    #[test]
    fn test_finalization_moves_stroke() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), None);
        canvas.extend(Point::new(20.0, 20.0), None);
        let id = canvas.active_stroke().expect("active").id;
        canvas.end();

        assert!(canvas.active_stroke().is_none());
        assert_eq!(canvas.strokes().iter().filter(|s| s.id == id).count(), 1);
        assert_eq!(canvas.all_strokes().filter(|s| s.id == id).count(), 1);
    }

    #[test]
    fn test_begin_finalizes_dangling_stroke() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), None);
        canvas.extend(Point::new(30.0, 0.0), None);
        canvas.begin(Point::new(50.0, 50.0), None);

        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.stroke_count(), 2);
    }

    #[test]
    fn test_stroke_color_fixed_at_begin() {
        let mut canvas = SignatureCanvas::default();
        canvas.begin(Point::new(0.0, 0.0), None);
        canvas.set_stroke_color(Color::rgb(255, 0, 0));
        canvas.extend(Point::new(20.0, 0.0), None);
        canvas.end();
        assert_eq!(canvas.strokes()[0].color, Color::BLACK);

        drag(&mut canvas, &[(0.0, 50.0), (20.0, 50.0)]);
        assert_eq!(canvas.strokes()[1].color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut canvas = SignatureCanvas::default();
        drag(&mut canvas, &[(0.0, 0.0), (20.0, 0.0)]);
        canvas.begin(Point::new(5.0, 5.0), None);
        assert!(!canvas.is_empty());

        canvas.clear();
        assert!(canvas.is_empty());
        canvas.clear();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut canvas = SignatureCanvas::default();
        canvas.set_stroke_color_str("blue").expect("blue");
        let result = canvas.set_stroke_color_str("not-a-color");
        assert!(matches!(result, Err(SignatureError::UnparseableColor(_))));
        assert_eq!(canvas.config().stroke_color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_invalid_width_rejected() {
        let mut canvas = SignatureCanvas::default();
        assert!(canvas.set_base_width(0.0).is_err());
        assert!(canvas.set_base_width(f32::NAN).is_err());
        assert!((canvas.config().base_width - DEFAULT_BASE_WIDTH).abs() < f32::EPSILON);
        canvas.set_base_width(2.0).expect("width");
        assert!((canvas.min_width() - 1.0).abs() < f32::EPSILON);
        assert!((canvas.max_width() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_process_event_dispatch() {
        let mut canvas = SignatureCanvas::new(300.0, 100.0);
        let events = [
            InputEvent::SetShowBaseline { visible: true },
            InputEvent::Pointer(PointerEvent::down(10.0, 10.0)),
            InputEvent::Pointer(PointerEvent::moved(40.0, 12.0)),
            InputEvent::Pointer(PointerEvent::up()),
        ];
        for event in &events {
            canvas.process_event(event).expect("event");
        }
        assert!(canvas.config().show_baseline);
        assert_eq!(canvas.strokes().len(), 1);
        assert!((canvas.baseline_y() - 70.0).abs() < 1e-4);

        canvas.process_event(&InputEvent::Clear).expect("clear");
        assert!(canvas.is_empty());

        let bad = InputEvent::SetStrokeColor {
            color: "mauve-ish".to_string(),
        };
        assert!(canvas.process_event(&bad).is_err());
    }

    #[test]
    fn test_with_config_rejects_bad_base_width() {
        for base_width in [-2.0, 0.0, f32::NAN, f32::INFINITY] {
            let config = CanvasConfig {
                base_width,
                ..CanvasConfig::default()
            };
            assert!(matches!(
                SignatureCanvas::with_config(200.0, 100.0, config),
                Err(SignatureError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_with_config_rejects_bad_smoothing() {
        let config = CanvasConfig {
            smoothing: SmoothingConfig {
                interpolation_step: 0.0,
                ..SmoothingConfig::default()
            },
            ..CanvasConfig::default()
        };
        assert!(matches!(
            SignatureCanvas::with_config(200.0, 100.0, config),
            Err(SignatureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_config_accepts_valid_config() {
        let config = CanvasConfig {
            base_width: 2.0,
            show_baseline: true,
            ..CanvasConfig::default()
        };
        let mut canvas = SignatureCanvas::with_config(200.0, 100.0, config).expect("valid");
        drag(&mut canvas, &[(0.0, 0.0), (20.0, 0.0)]);
        assert_eq!(canvas.config(), &config);
        assert!(canvas.strokes()[0]
            .vertices()
            .iter()
            .all(|v| v.width >= canvas.min_width() && v.width <= canvas.max_width()));
    }
}
