//! Raster converter: one still image in, one artifact out.

use crate::error::ConvertError;
use crate::format::FormatSpec;
use crate::pipeline::encode::{self, EmitError, EncodeContext};
use crate::pipeline::{resolution, write};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

/// A written artifact and any swallowed failure attached to it.
#[derive(Debug)]
pub struct Emitted {
    pub path: PathBuf,
    pub warning: Option<String>,
}

/// Decode `source` and write it as `format` into `out_dir`.
///
/// The artifact is named `<source stem><extension>`.
pub fn convert_image(
    source: &Path,
    out_dir: &Path,
    format: &FormatSpec,
    ctx: &EncodeContext<'_>,
) -> Result<Emitted, ConvertError> {
    let bytes = std::fs::read(source).map_err(|e| ConvertError::Decode {
        path: source.to_path_buf(),
        detail: e.to_string(),
    })?;
    let dpi = resolution::embedded_dpi(&bytes);
    let image = decode(source, &bytes)?;

    let out_path = write::artifact_path(out_dir, source, format.extension);
    let warning = encode::emit(image, format, &out_path, dpi, ctx).map_err(|e| match e {
        EmitError::Encode(detail) => ConvertError::Encode {
            path: source.to_path_buf(),
            encoder: format.encoder,
            detail,
        },
        EmitError::Write(io) => ConvertError::OutputWriteFailed {
            path: out_path.clone(),
            source: io,
        },
    })?;

    info!("Converted image {} to {}", source.display(), out_path.display());
    Ok(Emitted {
        path: out_path,
        warning,
    })
}

/// Decode from memory, sniffing the content first and falling back to the
/// extension for signature-less formats such as TGA.
fn decode(source: &Path, bytes: &[u8]) -> Result<DynamicImage, ConvertError> {
    let decode_err = |detail: String| ConvertError::Decode {
        path: source.to_path_buf(),
        detail,
    };

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(source) {
            reader.set_format(format);
        }
    }
    reader.decode().map_err(|e| decode_err(e.to_string()))
}
