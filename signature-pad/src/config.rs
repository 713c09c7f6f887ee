//! Command-line and library configuration for the signature pad.

use std::path::PathBuf;

use clap::Parser;
use signature_core::{CanvasConfig, Color};
use signature_renderer::{ExportConfig, ExportFormat};

/// Command-line arguments for signature-pad.
#[derive(Debug, Clone, Parser)]
#[command(name = "signature-pad")]
#[command(about = "Replay a signature gesture script and save the result as an image")]
#[command(version)]
pub struct CliArgs {
    /// Gesture script (JSON array of input events); `-` reads stdin
    #[arg(default_value = "-")]
    pub script: PathBuf,

    /// Directory saved signatures are written to
    #[arg(long, env = "SIGNATURE_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output format (jpeg or png)
    #[arg(long, env = "SIGNATURE_FORMAT", default_value = "jpeg")]
    pub format: ExportFormat,

    /// Canvas width in points
    #[arg(long, default_value = "600")]
    pub width: f32,

    /// Canvas height in points
    #[arg(long, default_value = "300")]
    pub height: f32,

    /// Initial stroke color (name or hex)
    #[arg(long, env = "SIGNATURE_STROKE_COLOR")]
    pub stroke_color: Option<String>,

    /// Base stroke width
    #[arg(long, env = "SIGNATURE_STROKE_WIDTH")]
    pub stroke_width: Option<f32>,

    /// Draw the baseline guide
    #[arg(long)]
    pub show_baseline: bool,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "90", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Output scale factor
    #[arg(long, default_value = "1.0")]
    pub scale: f32,
}

/// Signature pad configuration.
#[derive(Debug, Clone)]
pub struct PadConfig {
    /// View width in points.
    pub width: f32,
    /// View height in points.
    pub height: f32,
    /// Directory saved signatures are written to.
    pub out_dir: PathBuf,
    /// Format used by `save`.
    pub format: ExportFormat,
    /// Canvas settings.
    pub canvas: CanvasConfig,
    /// Export settings.
    pub export: ExportConfig,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PadConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            out_dir: PathBuf::from("."),
            format: ExportFormat::Jpeg,
            canvas: CanvasConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl From<CliArgs> for PadConfig {
    fn from(args: CliArgs) -> Self {
        let mut canvas = CanvasConfig {
            show_baseline: args.show_baseline,
            ..CanvasConfig::default()
        };
        if let Some(color) = args.stroke_color.as_deref() {
            match Color::parse(color) {
                Ok(parsed) => canvas.stroke_color = parsed,
                Err(e) => tracing::warn!("{e}, using {}", canvas.stroke_color),
            }
        }
        match args.stroke_width {
            Some(width) if width.is_finite() && width > 0.0 => canvas.base_width = width,
            Some(width) => tracing::warn!(
                "Ignoring stroke width {width}, using {}",
                canvas.base_width
            ),
            None => {}
        }

        Self {
            width: args.width,
            height: args.height,
            out_dir: args.out_dir,
            format: args.format,
            canvas,
            export: ExportConfig {
                jpeg_quality: args.jpeg_quality,
                scale: args.scale,
            },
        }
    }
}
