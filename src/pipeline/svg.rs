//! SVG export: key out the background, then embed the result as a base64 PNG
//! inside a minimal SVG document.
//!
//! The raster is not traced into vector paths. The `<svg>` root carries the
//! image's pixel dimensions and holds a single `<image>` element whose `href`
//! is a `data:image/png;base64,…` URI.

use crate::config::{BackgroundKey, SvgWriteFailure};
use crate::pipeline::{background, write};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("{0}")]
    Write(#[from] std::io::Error),
}

/// Build the SVG document for `image` after background keying.
pub fn render_svg(image: DynamicImage, key: BackgroundKey) -> Result<String, image::ImageError> {
    let keyed = DynamicImage::ImageRgba8(background::remove_background(image, key));
    let (width, height) = (keyed.width(), keyed.height());

    let mut buf = Vec::new();
    keyed.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    let data = STANDARD.encode(&buf);
    debug!("Embedded {}x{} PNG → {} bytes base64", width, height, data.len());

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
  <image href="data:image/png;base64,{data}" width="{width}" height="{height}" />
</svg>
"#
    ))
}

/// Render and write an SVG.
///
/// With [`SvgWriteFailure::LogAndContinue`] a failed write is logged and
/// returned as `Ok(Some(message))` so the caller can record it as a warning
/// without failing. Encoding failures always propagate.
pub fn export_svg(
    image: DynamicImage,
    output_path: &Path,
    key: BackgroundKey,
    on_write_failure: SvgWriteFailure,
) -> Result<Option<String>, SvgError> {
    let svg = render_svg(image, key)?;
    match write::write_atomic(output_path, svg.as_bytes()) {
        Ok(()) => {
            debug!("SVG saved to {}", output_path.display());
            Ok(None)
        }
        Err(e) => match on_write_failure {
            SvgWriteFailure::LogAndContinue => {
                let msg = format!("Error saving SVG {}: {}", output_path.display(), e);
                error!("{}", msg);
                Ok(Some(msg))
            }
            SvgWriteFailure::Propagate => Err(SvgError::Write(e)),
        },
    }
}
