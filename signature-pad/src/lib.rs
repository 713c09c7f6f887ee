//! # Signature Pad
//!
//! Host shell around [`signature_core`] and [`signature_renderer`]: owns a
//! canvas, exports it on save, and writes the image to a
//! [`PersistenceSink`].
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p signature-pad -- gesture.json --format png --out-dir ./out
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `PadConfig` - Canvas, export and output settings
//! - `SignaturePad` - Canvas + exporter + sink, with save/clear events
//! - `DirectorySink` - Writes `signature_<unix-millis>.<ext>` files

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod pad;
mod sink;

pub use config::{CliArgs, PadConfig};
pub use pad::{OnPadEventCallback, PadError, PadEvent, PadResult, SignaturePad};
pub use sink::{
    DirectorySink, MemorySink, PersistenceSink, SavedSignature, SinkError, SinkResult,
    FILE_PREFIX,
};
