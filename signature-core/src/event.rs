//! Input events delivered by the host.

use serde::{Deserialize, Serialize};

use crate::{BackgroundMode, Point, Sample};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Pointer went down (finger or stylus touched).
    Down,
    /// Pointer moved while down.
    Move,
    /// Pointer lifted.
    Up,
}

/// A single pointer sample from the host's input dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in view coordinates.
    #[serde(default)]
    pub x: f32,
    /// Y position in view coordinates.
    #[serde(default)]
    pub y: f32,
    /// Pressure (0.0 to 1.0, if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
    /// Host timestamp in milliseconds. Ordering is by arrival; this is
    /// carried for diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl PointerEvent {
    /// Pointer-down at a position.
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Pointer-move to a position.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Pointer-up.
    #[must_use]
    pub fn up() -> Self {
        Self::new(PointerPhase::Up, 0.0, 0.0)
    }

    fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            pressure: None,
            timestamp_ms: None,
        }
    }

    /// Attach a pressure reading.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Position of the event.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Position and pressure as a capture sample.
    #[must_use]
    pub fn sample(&self) -> Sample {
        Sample::new(self.point(), self.pressure)
    }
}

/// All events and commands a signature canvas accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Raw pointer sample.
    Pointer(PointerEvent),

    /// Discard every stroke.
    Clear,

    /// Change the color used for new strokes.
    SetStrokeColor {
        /// Color name or hex literal.
        color: String,
    },

    /// Change the base stroke width.
    SetStrokeWidth {
        /// Width in pixels.
        width: f32,
    },

    /// Show or hide the baseline guide.
    SetShowBaseline {
        /// Whether the guide is drawn.
        visible: bool,
    },

    /// Change how the background is filled when rendering.
    SetBackgroundMode {
        /// Background policy.
        mode: BackgroundMode,
    },
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Parse a recorded gesture script (a JSON array of [`InputEvent`]s).
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
pub fn parse_script(json: &str) -> crate::SignatureResult<Vec<InputEvent>> {
    Ok(serde_json::from_str(json)?)
}
