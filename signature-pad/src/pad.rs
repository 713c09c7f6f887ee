//! The signature pad: a canvas wired to an exporter and a sink.

use signature_core::{InputEvent, SignatureCanvas, SignatureError};
use signature_renderer::{ExportFormat, RenderError, SignatureExporter};

use crate::config::PadConfig;
use crate::sink::{DirectorySink, PersistenceSink, SavedSignature, SinkError};

/// Result type for pad operations.
pub type PadResult<T> = Result<T, PadError>;

/// Errors that can occur while driving or saving a signature pad.
#[derive(Debug, thiserror::Error)]
pub enum PadError {
    /// Rendering or encoding failed (including an empty canvas).
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    /// The encoded image could not be stored.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
    /// A configuration command was rejected.
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),
}

impl PadError {
    /// Whether this error means there was nothing to save.
    #[must_use]
    pub fn is_empty_canvas(&self) -> bool {
        matches!(self, Self::Render(RenderError::EmptyCanvas))
    }
}

/// Notifications emitted by a [`SignaturePad`].
#[derive(Debug, Clone, PartialEq)]
pub enum PadEvent {
    /// All strokes were removed.
    Cleared,
    /// A signature was exported and stored.
    Saved(SavedSignature),
    /// A save attempt produced no file.
    SaveFailed {
        /// Why the save failed.
        reason: String,
        /// Whether the canvas was empty.
        empty_canvas: bool,
    },
}

/// Callback type for pad events.
pub type OnPadEventCallback = Box<dyn Fn(&PadEvent) + Send + Sync>;

/// A signature canvas with save and clear actions.
pub struct SignaturePad<S: PersistenceSink> {
    canvas: SignatureCanvas,
    exporter: SignatureExporter,
    sink: S,
    format: ExportFormat,
    on_event: Option<OnPadEventCallback>,
}

impl<S: PersistenceSink> std::fmt::Debug for SignaturePad<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePad")
            .field("canvas", &self.canvas)
            .field("exporter", &self.exporter)
            .field("format", &self.format)
            .field("on_event", &self.on_event.is_some())
            .finish_non_exhaustive()
    }
}

impl SignaturePad<DirectorySink> {
    /// Build a pad that saves into the configured directory.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Signature`] if the canvas settings are invalid, or
    /// [`PadError::Sink`] if the output directory cannot be created.
    pub fn from_config(config: PadConfig) -> PadResult<Self> {
        let canvas = SignatureCanvas::with_config(config.width, config.height, config.canvas)?;
        let sink = DirectorySink::new(&config.out_dir)?;
        Ok(Self::new(
            canvas,
            SignatureExporter::new(config.export),
            sink,
            config.format,
        ))
    }
}

impl<S: PersistenceSink> SignaturePad<S> {
    /// Create a pad from its parts.
    #[must_use]
    pub fn new(
        canvas: SignatureCanvas,
        exporter: SignatureExporter,
        sink: S,
        format: ExportFormat,
    ) -> Self {
        Self {
            canvas,
            exporter,
            sink,
            format,
            on_event: None,
        }
    }

    /// Set the listener for pad events.
    pub fn set_on_event<F>(&mut self, callback: F)
    where
        F: Fn(&PadEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Box::new(callback));
    }

    /// The underlying canvas.
    #[must_use]
    pub fn canvas(&self) -> &SignatureCanvas {
        &self.canvas
    }

    /// Mutable access to the underlying canvas.
    pub fn canvas_mut(&mut self) -> &mut SignatureCanvas {
        &mut self.canvas
    }

    /// The sink saved images go to.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Format used by [`Self::save`].
    #[must_use]
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Change the format used by [`Self::save`].
    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    /// Whether nothing has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canvas.is_empty()
    }

    /// Apply one host event. `Clear` goes through [`Self::clear`].
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Signature`] if a configuration command is rejected.
    pub fn apply(&mut self, event: &InputEvent) -> PadResult<()> {
        if matches!(event, InputEvent::Clear) {
            self.clear();
            return Ok(());
        }
        self.canvas.process_event(event)?;
        Ok(())
    }

    /// Apply a sequence of events, skipping rejected commands.
    ///
    /// Returns the number of rejected commands.
    pub fn replay<'a, I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a InputEvent>,
    {
        let mut rejected = 0;
        for event in events {
            if let Err(e) = self.apply(event) {
                tracing::warn!("Skipping event {event:?}: {e}");
                rejected += 1;
            }
        }
        rejected
    }

    /// Remove all strokes and notify the listener.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.emit(&PadEvent::Cleared);
    }

    /// Export in the pad's format and store the result.
    ///
    /// # Errors
    ///
    /// See [`Self::save_as`].
    pub fn save(&self) -> PadResult<SavedSignature> {
        self.save_as(self.format)
    }

    /// Export in `format` and store the result.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Render`] with [`RenderError::EmptyCanvas`] if
    /// nothing has been drawn, or if encoding fails; [`PadError::Sink`] if
    /// the image cannot be stored.
    pub fn save_as(&self, format: ExportFormat) -> PadResult<SavedSignature> {
        let result = self
            .exporter
            .export(&self.canvas, format)
            .map_err(PadError::from)
            .and_then(|image| self.sink.persist(&image).map_err(PadError::from));

        match &result {
            Ok(saved) => self.emit(&PadEvent::Saved(saved.clone())),
            Err(e) => {
                tracing::warn!("Signature not saved: {e}");
                self.emit(&PadEvent::SaveFailed {
                    reason: e.to_string(),
                    empty_canvas: e.is_empty_canvas(),
                });
            }
        }
        result
    }

    fn emit(&self, event: &PadEvent) {
        if let Some(ref callback) = self.on_event {
            callback(event);
        }
    }
}
