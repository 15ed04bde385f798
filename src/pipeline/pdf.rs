//! PDF rasteriser: every page becomes its own artifact.
//!
//! Pages are rendered at [`PDF_ZOOM`] in document order, flattened to opaque
//! RGB, and pushed through the same encode step as single images. A page that fails to render, encode or
//! write is logged and recorded as a [`PageError`]; the loop moves on to the
//! next page. Only failing to open the document fails the job.
//!
//! Artifacts are named `<stem>_page<N><extension>` with N starting at 1.

use crate::config::PDF_ZOOM;
use crate::error::{ConvertError, PageError};
use crate::format::FormatSpec;
use crate::pipeline::encode::{self, EmitError, EncodeContext};
use crate::pipeline::write;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Successes and failures collected over a document's pages.
#[derive(Debug, Default)]
pub struct PdfOutcome {
    pub page_count: usize,
    pub artifacts: Vec<PathBuf>,
    pub failures: Vec<PageError>,
    pub warnings: Vec<String>,
}

pub fn convert_pdf(
    source: &Path,
    out_dir: &Path,
    format: &FormatSpec,
    ctx: &EncodeContext<'_>,
) -> Result<PdfOutcome, ConvertError> {
    let mut outcome = PdfOutcome::default();

    let mut on_page = |page: usize, rendered: Result<DynamicImage, String>| {
        let out_path =
            write::artifact_path(out_dir, source, &format!("_page{page}{}", format.extension));

        let result = rendered
            .map_err(|detail| PageError::RenderFailed { page, detail })
            .and_then(|image| {
                encode::emit(flatten(image), format, &out_path, None, ctx).map_err(|e| match e {
                    EmitError::Encode(detail) => PageError::EncodeFailed { page, detail },
                    EmitError::Write(e) => PageError::WriteFailed {
                        page,
                        path: out_path.clone(),
                        detail: e.to_string(),
                    },
                })
            });

        match result {
            Ok(warning) => {
                info!("Converted PDF page {} to {}", page, out_path.display());
                outcome.warnings.extend(warning);
                outcome.artifacts.push(out_path);
            }
            Err(e) => {
                warn!("Error converting PDF page {} of {}: {}", page, source.display(), e);
                outcome.failures.push(e);
            }
        }
    };

    let page_count = ctx.backend.render_pages(
        source,
        ctx.config.password.as_deref(),
        PDF_ZOOM,
        &mut on_page,
    )?;
    outcome.page_count = page_count;

    info!(
        "PDF {}: {}/{} pages converted",
        source.display(),
        outcome.artifacts.len(),
        page_count
    );
    Ok(outcome)
}

/// Rendered pages carry no transparency.
fn flatten(page: DynamicImage) -> DynamicImage {
    match page {
        DynamicImage::ImageRgb8(_) => page,
        other => DynamicImage::ImageRgb8(other.into_rgb8()),
    }
}
