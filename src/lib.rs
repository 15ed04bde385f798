//! # docshift
//!
//! Convert raster images, PDFs and office documents into a chosen output
//! format.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source file
//!  │
//!  ├─ 1. Resolve   format name → FormatSpec (unknown names → JPEG)
//!  ├─ 2. Classify  extension → image | PDF | document
//!  ├─ 3. Guard     reject image→document and document→image, before any I/O
//!  ├─ 4. Route
//!  │     ├─ image     decode, coerce, encode          → 1 artifact
//!  │     ├─ PDF       render each page at 3×, encode  → 1 artifact per page
//!  │     └─ document  byte copy under new extension   → 1 artifact
//!  └─ 5. Output    ConversionOutput (artifacts, skipped pages, warnings)
//! ```
//!
//! SVG output embeds a PNG, after keying out near-white pixels, as a base64
//! data URI. A failing PDF page is logged and skipped; its siblings still
//! convert.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docshift::{ConversionConfig, Engine};
//!
//! fn main() -> Result<(), docshift::ConvertError> {
//!     let engine = Engine::new(ConversionConfig::default());
//!     let output = engine.convert("scan.pdf", "out", "PNG")?;
//!     println!("{} page image(s) written", output.artifact_count());
//!     for failure in &output.page_failures {
//!         eprintln!("skipped: {failure}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For many files use [`convert_batch`] (async, worker threads, progress
//! callbacks) or [`convert_stream`] (outcomes as they complete).
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docshift` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docshift = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! PDF sources and the `PDF` target need a pdfium shared library. It is
//! bound on first use from `PDFIUM_LIB_PATH`, the working directory, or the
//! system library path. Image and document jobs never load it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_batch, convert_batch_blocking};
pub use config::{
    BackgroundKey, ConversionConfig, ConversionConfigBuilder, SvgWriteFailure,
    UnknownFormatPolicy, PDF_ZOOM,
};
pub use convert::Engine;
pub use error::{ConvertError, ErrorKind, PageError};
pub use format::{Encoder, FormatFamily, FormatSpec, InputClass};
pub use output::{BatchReport, ConversionOutput, FileOutcome};
pub use pipeline::render::{PdfBackend, PdfiumBackend};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, FileStream};
