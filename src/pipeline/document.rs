//! Document passthrough for Word, Excel and CSV containers.
//!
//! No content is reinterpreted: the source bytes are copied verbatim under
//! the target extension, so a `.csv` "converted" to `EXCEL` is still CSV text
//! inside a `.xlsx` file.

use crate::error::ConvertError;
use crate::format::{FormatFamily, FormatSpec};
use crate::pipeline::write;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn convert_document(
    source: &Path,
    out_dir: &Path,
    format: &FormatSpec,
) -> Result<PathBuf, ConvertError> {
    if format.encoder.family() != FormatFamily::Document {
        return Err(ConvertError::ClassificationMismatch {
            path: source.to_path_buf(),
            class: crate::format::InputClass::DocumentContainer,
            target: format.encoder,
        });
    }

    let out_path = write::artifact_path(out_dir, source, format.extension);
    std::fs::copy(source, &out_path).map_err(|e| ConvertError::OutputWriteFailed {
        path: out_path.clone(),
        source: e,
    })?;

    info!("Copied document {} to {}", source.display(), out_path.display());
    Ok(out_path)
}
