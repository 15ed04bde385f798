//! Conversion stages.
//!
//! Each submodule implements one step. The three strategies ([`raster`],
//! [`pdf`], [`document`]) are selected by [`crate::convert::Engine`]; the
//! raster and PDF strategies share [`encode`] so a page and a still image
//! obey the same coercion and encoder rules.
//!
//! ## Data Flow
//!
//! ```text
//! input ──┬─▶ raster ──────────┬─▶ encode ──▶ write (atomic)
//! (checks)├─▶ pdf ◀── render   │   (coerce)  └▶ svg ◀── background
//!         │   (page fold) ─────┘      ▲
//!         │                           └── resolution (embedded DPI)
//!         └─▶ document (byte copy)
//! ```
//!
//! 1. [`input`]       verify the source; expand batch inputs
//! 2. [`render`]      PDF backend seam; pdfium bound lazily
//! 3. [`resolution`]  embedded DPI from PNG `pHYs` / JFIF `APP0`
//! 4. [`encode`]      opaque coercion plus per-encoder parameters
//! 5. [`background`]  color keying ahead of SVG embedding
//! 6. [`svg`]         PNG-in-SVG document
//! 7. [`write`]       artifact naming and atomic writes

pub mod background;
pub mod document;
pub mod encode;
pub mod input;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod resolution;
pub mod svg;
pub mod write;
