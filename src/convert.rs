//! Conversion dispatcher: the single-file entry point.
//!
//! [`Engine::convert`] classifies the source by extension, checks that the
//! target's family is acceptable for that class, and routes to one of the
//! three strategies:
//!
//! | input class | strategy | artifacts |
//! |---|---|---|
//! | PDF | page rasteriser | one per successfully converted page |
//! | document container | byte copy under the new extension | 1 |
//! | raster image | decode + re-encode | 1 |
//!
//! The family guard runs before any I/O: an image→document or
//! document→image request never touches the filesystem.
//!
//! The engine is synchronous and holds no per-call state. Clone it freely;
//! the batch drivers hand a clone to each worker.

use crate::config::{ConversionConfig, UnknownFormatPolicy};
use crate::error::ConvertError;
use crate::format::{self, FormatSpec, InputClass};
use crate::output::ConversionOutput;
use crate::pipeline::encode::EncodeContext;
use crate::pipeline::render::{PdfBackend, PdfiumBackend};
use crate::pipeline::{document, input, pdf, raster};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Conversion engine: a configuration plus the PDF backend it renders with.
#[derive(Clone)]
pub struct Engine {
    config: ConversionConfig,
    backend: Arc<dyn PdfBackend>,
}

impl Engine {
    /// An engine backed by pdfium. The library is bound on the first PDF job.
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_backend(config, Arc::new(PdfiumBackend::new()))
    }

    /// An engine with a caller-supplied PDF backend.
    pub fn with_backend(config: ConversionConfig, backend: Arc<dyn PdfBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Resolve a format name under the configured [`UnknownFormatPolicy`].
    pub fn resolve_format(&self, name: &str) -> Result<&'static FormatSpec, ConvertError> {
        match (format::lookup(name), self.config.unknown_format) {
            (Some(spec), _) => Ok(spec),
            (None, UnknownFormatPolicy::FallbackToJpeg) => {
                debug!("Unknown format '{}', falling back to JPEG", name);
                Ok(format::resolve(name))
            }
            (None, UnknownFormatPolicy::Reject) => Err(ConvertError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    /// Convert one source file into `out_dir` as `format_name`.
    ///
    /// # Returns
    /// `Ok(ConversionOutput)` whenever the file as a whole succeeded, even if
    /// some PDF pages were skipped (see `page_failures`).
    ///
    /// # Errors
    /// - [`ConvertError::ClassificationMismatch`] for cross-family requests,
    ///   before any I/O
    /// - [`ConvertError::UnknownFormat`] under [`UnknownFormatPolicy::Reject`]
    /// - source, decode, encode and write failures for the file as a whole
    pub fn convert(
        &self,
        source: impl AsRef<Path>,
        out_dir: impl AsRef<Path>,
        format_name: &str,
    ) -> Result<ConversionOutput, ConvertError> {
        let start = Instant::now();
        let source = source.as_ref();
        let out_dir = out_dir.as_ref();

        let format = self.resolve_format(format_name)?;
        let input_class = InputClass::from_path(source);

        // ── Family guard ─────────────────────────────────────────────────
        if !input_class.accepts(format.encoder) {
            warn!(
                "Rejected {} → {}: {} input cannot become {}",
                source.display(),
                format.name,
                input_class,
                format.encoder
            );
            return Err(ConvertError::ClassificationMismatch {
                path: source.to_path_buf(),
                class: input_class,
                target: format.encoder,
            });
        }

        input::check_source(source)?;
        debug!(
            "Converting {} ({}) to {} [{}]",
            source.display(),
            input_class,
            format.name,
            format.encoder
        );

        let ctx = EncodeContext {
            config: &self.config,
            backend: self.backend.as_ref(),
        };

        let (artifacts, page_failures, warnings) = match input_class {
            InputClass::Pdf => {
                let outcome = pdf::convert_pdf(source, out_dir, format, &ctx)?;
                (outcome.artifacts, outcome.failures, outcome.warnings)
            }
            InputClass::DocumentContainer => {
                let copied = document::convert_document(source, out_dir, format)?;
                (vec![copied], Vec::new(), Vec::new())
            }
            InputClass::RasterImage => {
                let emitted = raster::convert_image(source, out_dir, format, &ctx)?;
                (vec![emitted.path], Vec::new(), emitted.warning.into_iter().collect())
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Converted {}: {} artifact(s) in {}ms",
            source.display(),
            artifacts.len(),
            duration_ms
        );

        Ok(ConversionOutput {
            source: source.to_path_buf(),
            input_class,
            format: *format,
            artifacts,
            page_failures,
            warnings,
            duration_ms,
        })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("backend", &"<dyn PdfBackend>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::PageSink;
    use image::DynamicImage;

    /// A backend that must never be reached.
    struct Unreachable;

    impl PdfBackend for Unreachable {
        fn render_pages(
            &self,
            _path: &Path,
            _password: Option<&str>,
            _zoom: f32,
            _on_page: &mut PageSink<'_>,
        ) -> Result<usize, ConvertError> {
            panic!("render_pages called");
        }

        fn image_to_pdf(&self, _image: &DynamicImage, _dpi: f32) -> Result<Vec<u8>, String> {
            panic!("image_to_pdf called");
        }
    }

    fn engine(config: ConversionConfig) -> Engine {
        Engine::with_backend(config, Arc::new(Unreachable))
    }

    #[test]
    fn guard_runs_before_io() {
        // Neither source exists: a mismatch must win over SourceNotFound.
        let e = engine(ConversionConfig::default());
        let err = e.convert("/nowhere/pic.png", "/nowhere", "EXCEL").unwrap_err();
        assert!(matches!(err, ConvertError::ClassificationMismatch { .. }));
        let err = e.convert("/nowhere/memo.docx", "/nowhere", "jpeg").unwrap_err();
        assert!(matches!(err, ConvertError::ClassificationMismatch { .. }));
    }

    #[test]
    fn accepted_request_checks_source() {
        let e = engine(ConversionConfig::default());
        let err = e.convert("/nowhere/pic.png", "/nowhere", "PNG").unwrap_err();
        assert!(matches!(err, ConvertError::SourceNotFound { .. }));
    }

    #[test]
    fn unknown_format_policy() {
        let lenient = engine(ConversionConfig::default());
        assert_eq!(lenient.resolve_format("XYZ").unwrap().extension, ".jpg");

        let strict = engine(
            ConversionConfig::builder()
                .unknown_format(UnknownFormatPolicy::Reject)
                .build()
                .unwrap(),
        );
        let err = strict.resolve_format("XYZ").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownFormat { .. }));
        assert_eq!(strict.resolve_format("png").unwrap().name, "PNG");
    }
}
