//! # Signature Core
//!
//! Freehand signature capture: turns a stream of pointer samples into
//! smooth, variable-width strokes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               signature-core                │
//! ├─────────────────────────────────────────────┤
//! │  Input           │  Capture                 │
//! │  - Pointer down  │  - Active stroke         │
//! │  - Pointer move  │  - Velocity smoothing    │
//! │  - Pointer up    │  - Width resolution      │
//! │  - Commands      │  - Interpolation         │
//! ├─────────────────────────────────────────────┤
//! │  Canvas State    │  Geometry                │
//! │  - Stroke list   │  - Quadratic curves      │
//! │  - Config        │    through midpoints     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rasterizing and encoding live in `signature-renderer`; this crate is
//! pure state and geometry.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod smoothing;
pub mod stroke;

pub use canvas::{
    BackgroundMode, CanvasConfig, SignatureCanvas, BASELINE_POSITION, DEFAULT_BASE_WIDTH,
};
pub use color::Color;
pub use error::{SignatureError, SignatureResult};
pub use event::{parse_script, InputEvent, PointerEvent, PointerPhase};
pub use geometry::{Point, Sample};
pub use smoothing::{SmoothedSample, SmoothingConfig, SmoothingState};
pub use stroke::{Stroke, StrokeId, StrokeSegment, Vertex};

/// Signature core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
