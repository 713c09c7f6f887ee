//! # Signature Renderer
//!
//! Rasterizes a [`signature_core::SignatureCanvas`] with tiny-skia and
//! encodes it to JPEG or PNG.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ SignatureCanvas│──▶│   Surface    │──▶│   Encoder    │
//! │ strokes+config │   │ (tiny-skia)  │   │ PNG / JPEG   │
//! └────────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! [`render`] draws onto any [`Surface`]; [`SignatureExporter`] owns the
//! offscreen path used for image export.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod render;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::{
    ExportConfig, ExportFormat, ExportOutcome, ExportedImage, OnExportCallback,
    SignatureExporter,
};
pub use render::{render, BaselineStyle, RenderOptions};
pub use surface::{RasterSurface, Surface};
