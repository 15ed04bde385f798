//! Error types for the docshift library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`ConvertError`] is **file-fatal**: the file cannot be converted at all
//!   (incompatible target family, undecodable source, unwritable output).
//!   Returned as `Err(ConvertError)` from [`crate::Engine::convert`]. The batch
//!   drivers catch it and record it as data so sibling files still run.
//!
//! * [`PageError`] is **page-local**: one PDF page failed to render, encode or
//!   write. Stored in [`crate::output::ConversionOutput::page_failures`]; the
//!   remaining pages are unaffected.

use crate::format::{Encoder, InputClass};
use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure taxonomy, for callers that group errors for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    /// Target family incompatible with the source class. Raised before any I/O.
    ClassificationMismatch,
    /// Source cannot be read or parsed as its declared type.
    DecodeFailure,
    /// The encoder rejected the pixel buffer.
    EncodeFailure,
    /// Output could not be written.
    IoFailure,
    /// Engine or environment misconfiguration.
    Configuration,
}

/// All file-fatal errors returned by the docshift library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Routing errors ────────────────────────────────────────────────────
    /// A document was asked to become an image, or an image a document.
    #[error("Cannot convert {class} file '{path}' to {target} format")]
    ClassificationMismatch {
        path: PathBuf,
        class: InputClass,
        target: Encoder,
    },

    /// The format name is not registered and the policy rejects unknown names.
    #[error("Unknown output format '{name}'")]
    UnknownFormat { name: String },

    // ── Input errors ──────────────────────────────────────────────────────
    #[error("Source file not found: '{path}'")]
    SourceNotFound { path: PathBuf },

    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The source could not be decoded as an image.
    #[error("Failed to decode '{path}': {detail}")]
    Decode { path: PathBuf, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF container could not be opened.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The encoder rejected the image (unsupported color model, no encoder).
    #[error("Failed to encode '{path}' as {encoder}: {detail}")]
    Encode {
        path: PathBuf,
        encoder: Encoder,
        detail: String,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Environment ───────────────────────────────────────────────────────
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF input and PDF output need the pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium, or\n\
  • place libpdfium next to the working directory, or\n\
  • install it system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::ClassificationMismatch { .. } => ErrorKind::ClassificationMismatch,
            ConvertError::SourceNotFound { .. }
            | ConvertError::PermissionDenied { .. }
            | ConvertError::Decode { .. }
            | ConvertError::CorruptPdf { .. }
            | ConvertError::PasswordRequired { .. }
            | ConvertError::WrongPassword { .. } => ErrorKind::DecodeFailure,
            ConvertError::Encode { .. } => ErrorKind::EncodeFailure,
            ConvertError::OutputWriteFailed { .. } => ErrorKind::IoFailure,
            ConvertError::UnknownFormat { .. }
            | ConvertError::PdfiumBindingFailed(_)
            | ConvertError::InvalidConfig(_)
            | ConvertError::Internal(_) => ErrorKind::Configuration,
        }
    }
}

/// A non-fatal error for a single PDF page. Page numbers are 1-based.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    #[error("Page {page}: encoding failed: {detail}")]
    EncodeFailed { page: usize, detail: String },

    #[error("Page {page}: write to '{path}' failed: {detail}")]
    WriteFailed {
        page: usize,
        path: PathBuf,
        detail: String,
    },
}

impl PageError {
    pub fn page(&self) -> usize {
        match self {
            PageError::RenderFailed { page, .. }
            | PageError::EncodeFailed { page, .. }
            | PageError::WriteFailed { page, .. } => *page,
        }
    }
}
