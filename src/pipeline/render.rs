//! PDF backend: page rasterisation and image-to-PDF writing via pdfium.
//!
//! The engine talks to pdfium only through [`PdfBackend`], so the page loop in
//! [`crate::pipeline::pdf`] can be exercised with a scripted backend in tests.
//!
//! ## Binding
//!
//! [`PdfiumBackend`] binds the pdfium shared library lazily, on the first
//! PDF job, and keeps the binding for its lifetime. Raster and document jobs
//! therefore never need libpdfium. The binding is shared by every batch
//! worker; pdfium-render's `sync` feature serialises the library calls.
//! Resolution order:
//!
//! 1. `PDFIUM_LIB_PATH`
//! 2. the platform library name in the working directory
//! 3. the system library search path

use crate::error::ConvertError;
use image::DynamicImage;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Receives each rendered page in document order. Page numbers are 1-based.
pub type PageSink<'a> = dyn FnMut(usize, Result<DynamicImage, String>) + 'a;

/// Rendering and writing services the engine needs from a PDF library.
pub trait PdfBackend: Send + Sync {
    /// Open `path` and render every page at `zoom` × native size, handing each
    /// result to `on_page` as soon as it is available.
    ///
    /// Returns the document's page count. Only a failure to open the
    /// document is an `Err`; per-page failures go to `on_page`.
    fn render_pages(
        &self,
        path: &Path,
        password: Option<&str>,
        zoom: f32,
        on_page: &mut PageSink<'_>,
    ) -> Result<usize, ConvertError>;

    /// Encode `image` as a single-page PDF sized at `dpi`.
    fn image_to_pdf(&self, image: &DynamicImage, dpi: f32) -> Result<Vec<u8>, String>;
}

/// [`PdfBackend`] backed by `pdfium-render`.
#[derive(Default)]
pub struct PdfiumBackend {
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn pdfium(&self) -> Result<&Pdfium, ConvertError> {
        self.pdfium.get_or_try_init(bind_pdfium)
    }
}

/// Bind to a pdfium shared library.
pub fn bind_pdfium() -> Result<Pdfium, ConvertError> {
    if let Ok(lib) = std::env::var("PDFIUM_LIB_PATH") {
        if !lib.is_empty() {
            debug!("Binding pdfium from PDFIUM_LIB_PATH={}", lib);
            return Pdfium::bind_to_library(&lib)
                .map(Pdfium::new)
                .map_err(|e| ConvertError::PdfiumBindingFailed(format!("'{}': {}", lib, e)));
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ConvertError::PdfiumBindingFailed(e.to_string()))
}

impl PdfBackend for PdfiumBackend {
    fn render_pages(
        &self,
        path: &Path,
        password: Option<&str>,
        zoom: f32,
        on_page: &mut PageSink<'_>,
    ) -> Result<usize, ConvertError> {
        let pdfium = self.pdfium()?;

        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    ConvertError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    ConvertError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                ConvertError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config = PdfRenderConfig::new().scale_page_by_factor(zoom);

        for idx in 0..total_pages {
            let rendered = pages
                .get(idx as u16)
                .and_then(|page| {
                    let bitmap = page.render_with_config(&render_config)?;
                    Ok(DynamicImage::ImageRgb8(bitmap.as_image().into_rgb8()))
                })
                .map_err(|e| format!("{:?}", e));

            if let Ok(ref image) = rendered {
                debug!(
                    "Rendered page {} → {}x{} px",
                    idx + 1,
                    image.width(),
                    image.height()
                );
            }
            on_page(idx + 1, rendered);
        }

        Ok(total_pages)
    }

    fn image_to_pdf(&self, image: &DynamicImage, dpi: f32) -> Result<Vec<u8>, String> {
        let pdfium = self.pdfium().map_err(|e| e.to_string())?;
        let mut document = pdfium.create_new_pdf().map_err(|e| format!("{:?}", e))?;

        let width = PdfPoints::new(image.width() as f32 * 72.0 / dpi);
        let height = PdfPoints::new(image.height() as f32 * 72.0 / dpi);

        {
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(width, height))
                .map_err(|e| format!("{:?}", e))?;
            page.objects_mut()
                .create_image_object(PdfPoints::ZERO, PdfPoints::ZERO, image, Some(width), Some(height))
                .map_err(|e| format!("{:?}", e))?;
        }

        document.save_to_bytes().map_err(|e| format!("{:?}", e))
    }
}
