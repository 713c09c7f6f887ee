//! Signature export to raster image formats.
//!
//! Renders a [`SignatureCanvas`] onto an offscreen tiny-skia surface sized to
//! the view and encodes it. JPEG has no alpha channel, so it is rendered
//! over the canvas background and then flattened onto white, which keeps a
//! translucent background color from turning black; PNG keeps untouched
//! pixels transparent.

use base64::Engine as _;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use signature_core::{BackgroundMode, SignatureCanvas};
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};
use crate::render::{render, RenderOptions};
use crate::surface::RasterSurface;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Compressed, opaque (JPEG).
    Jpeg,
    /// Lossless with alpha (PNG).
    Png,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded output.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Background mode the format is rendered with.
    #[must_use]
    pub const fn background_mode(self) -> BackgroundMode {
        match self {
            Self::Jpeg => BackgroundMode::Opaque,
            Self::Png => BackgroundMode::Transparent,
        }
    }

    /// Parse a format name such as `"JPEG"`, `"jpg"` or `"PNG"`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFormat`] for any other name.
    pub fn from_name(name: &str) -> RenderResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(RenderError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// An encoded signature image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding used.
    pub format: ExportFormat,
}

impl ExportedImage {
    /// Encoded size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// The image as a `data:` URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.format.mime_type())
    }
}

/// What happened on an export, reported to the export callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// An image was produced.
    Succeeded {
        /// Encoding used.
        format: ExportFormat,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Encoded size in bytes.
        size: usize,
    },
    /// No image was produced.
    Failed {
        /// Encoding requested.
        format: ExportFormat,
        /// Why the export failed.
        reason: String,
        /// Whether the failure was an empty canvas.
        empty_canvas: bool,
    },
}

/// Callback invoked after every export attempt.
pub type OnExportCallback = Box<dyn Fn(&ExportOutcome) + Send + Sync>;

/// Configuration for export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            scale: 1.0,
        }
    }
}

/// Exports a [`SignatureCanvas`] to encoded images.
pub struct SignatureExporter {
    config: ExportConfig,
    on_export: Option<OnExportCallback>,
}

impl std::fmt::Debug for SignatureExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureExporter")
            .field("config", &self.config)
            .field("on_export", &self.on_export.is_some())
            .finish()
    }
}

impl Default for SignatureExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl SignatureExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            on_export: None,
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Get the export configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Set the callback notified after each export, successful or not.
    pub fn set_on_export<F>(&mut self, callback: F)
    where
        F: Fn(&ExportOutcome) + Send + Sync + 'static,
    {
        self.on_export = Some(Box::new(callback));
    }

    /// Export the canvas in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyCanvas`] if nothing has been drawn, or an
    /// error if the surface cannot be allocated or encoding fails.
    pub fn export(
        &self,
        canvas: &SignatureCanvas,
        format: ExportFormat,
    ) -> RenderResult<ExportedImage> {
        let result = self.export_inner(canvas, format);

        match &result {
            Ok(image) => tracing::info!(
                "Exported {}x{} {:?} signature ({} bytes)",
                image.width,
                image.height,
                format,
                image.size()
            ),
            Err(e) => tracing::warn!("Signature export failed: {e}"),
        }

        if let Some(ref callback) = self.on_export {
            callback(&outcome(&result, format));
        }
        result
    }

    fn export_inner(
        &self,
        canvas: &SignatureCanvas,
        format: ExportFormat,
    ) -> RenderResult<ExportedImage> {
        if canvas.is_empty() {
            return Err(RenderError::EmptyCanvas);
        }

        let pixmap = self.render_pixmap(canvas, format.background_mode())?;
        let bytes = match format {
            ExportFormat::Png => encode_png(&pixmap)?,
            ExportFormat::Jpeg => encode_jpeg(&pixmap, JPEG_MATTE, self.config.jpeg_quality)?,
        };

        Ok(ExportedImage {
            bytes,
            width: pixmap.width(),
            height: pixmap.height(),
            format,
        })
    }

    /// Render the canvas onto a fresh pixmap sized to its view bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the pixmap cannot be allocated.
    pub fn render_pixmap(
        &self,
        canvas: &SignatureCanvas,
        mode: BackgroundMode,
    ) -> RenderResult<Pixmap> {
        let (width, height) = view_dimensions(canvas);
        let mut surface = RasterSurface::new(width, height, self.config.scale)?;
        let options = RenderOptions::from_canvas(canvas).with_background_mode(mode);
        render(canvas, &mut surface, &options);
        Ok(surface.into_pixmap())
    }
}

fn outcome(result: &RenderResult<ExportedImage>, format: ExportFormat) -> ExportOutcome {
    match result {
        Ok(image) => ExportOutcome::Succeeded {
            format,
            width: image.width,
            height: image.height,
            size: image.size(),
        },
        Err(e) => ExportOutcome::Failed {
            format,
            reason: e.to_string(),
            empty_canvas: matches!(e, RenderError::EmptyCanvas),
        },
    }
}

/// View size rounded to whole pixels, at least 1x1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn view_dimensions(canvas: &SignatureCanvas) -> (u32, u32) {
    let (width, height) = canvas.viewport();
    (
        width.round().max(1.0) as u32,
        height.round().max(1.0) as u32,
    )
}

fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encoding(format!("PNG encoding failed: {e}")))
}

/// Backdrop that JPEG output is flattened onto.
const JPEG_MATTE: [u8; 3] = [255, 255, 255];

/// Flatten premultiplied RGBA over `background` and encode as JPEG.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_jpeg(pixmap: &Pixmap, background: [u8; 3], quality: u8) -> RenderResult<Vec<u8>> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut rgb_data = Vec::with_capacity(pixmap.data().len() / 4 * 3);
    for pixel in pixmap.data().chunks_exact(4) {
        let inv = 1.0 - f32::from(pixel[3]) / 255.0;
        for (&src, &bg) in pixel[..3].iter().zip(&background) {
            let value = f32::from(bg).mul_add(inv, f32::from(src));
            rgb_data.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
        .map_err(|e| RenderError::Encoding(format!("JPEG encoding failed: {e}")))?;

    Ok(buf.into_inner())
}
