//! Format registry: output format names, encoders, and input classification.
//!
//! The registry is a fixed table loaded once per process. Every user-facing
//! format name maps to exactly one [`FormatSpec`]; several names may share an
//! encoder (`JPEG`, `JPG`, `JPGE` and `JFIF` all write JPEG data, the last one
//! under a `.jfif` extension).
//!
//! Input files are classified purely by their lowercased extension. There is
//! no content sniffing here: a misnamed file is routed by its extension and
//! fails later, at decode time.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A concrete output codec or writer.
///
/// Closed set: matching on it is exhaustive, so adding a variant forces every
/// routing decision in the crate to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Encoder {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Tiff,
    WebP,
    Ico,
    Ppm,
    Tga,
    Jpeg2000,
    Pdf,
    Svg,
    Heic,
    Excel,
    Word,
    Csv,
}

/// Which side of the raster/document divide an encoder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatFamily {
    Raster,
    Document,
}

impl Encoder {
    /// Stable encoder identifier, e.g. `RASTER_JPEG` or `DOC_CSV`.
    pub fn id(self) -> &'static str {
        match self {
            Encoder::Jpeg => "RASTER_JPEG",
            Encoder::Png => "RASTER_PNG",
            Encoder::Bmp => "RASTER_BMP",
            Encoder::Gif => "RASTER_GIF",
            Encoder::Tiff => "RASTER_TIFF",
            Encoder::WebP => "RASTER_WEBP",
            Encoder::Ico => "RASTER_ICO",
            Encoder::Ppm => "RASTER_PPM",
            Encoder::Tga => "RASTER_TGA",
            Encoder::Jpeg2000 => "RASTER_JP2",
            Encoder::Pdf => "RASTER_PDF",
            Encoder::Svg => "RASTER_SVG",
            Encoder::Heic => "RASTER_HEIC",
            Encoder::Excel => "DOC_EXCEL",
            Encoder::Word => "DOC_WORD",
            Encoder::Csv => "DOC_CSV",
        }
    }

    pub fn family(self) -> FormatFamily {
        match self {
            Encoder::Excel | Encoder::Word | Encoder::Csv => FormatFamily::Document,
            _ => FormatFamily::Raster,
        }
    }

    pub fn is_document(self) -> bool {
        self.family() == FormatFamily::Document
    }

    /// Encoders that cannot represent an alpha channel. Images are coerced to
    /// opaque 8-bit RGB before reaching them.
    pub fn requires_opaque(self) -> bool {
        matches!(self, Encoder::Jpeg | Encoder::Jpeg2000 | Encoder::Heic)
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A registry entry: user-facing name, encoder, and output extension
/// (including the leading dot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatSpec {
    pub name: &'static str,
    pub encoder: Encoder,
    pub extension: &'static str,
}

const fn spec(name: &'static str, encoder: Encoder, extension: &'static str) -> FormatSpec {
    FormatSpec {
        name,
        encoder,
        extension,
    }
}

/// All registered output formats, in display order.
pub const FORMATS: &[FormatSpec] = &[
    spec("JPEG", Encoder::Jpeg, ".jpg"),
    spec("JPG", Encoder::Jpeg, ".jpg"),
    spec("JPGE", Encoder::Jpeg, ".jpg"),
    spec("JFIF", Encoder::Jpeg, ".jfif"),
    spec("PNG", Encoder::Png, ".png"),
    spec("BMP", Encoder::Bmp, ".bmp"),
    spec("GIF", Encoder::Gif, ".gif"),
    spec("TIFF", Encoder::Tiff, ".tiff"),
    spec("WEBP", Encoder::WebP, ".webp"),
    spec("ICO", Encoder::Ico, ".ico"),
    spec("PPM", Encoder::Ppm, ".ppm"),
    spec("TGA", Encoder::Tga, ".tga"),
    spec("JPEG2000", Encoder::Jpeg2000, ".jp2"),
    spec("PDF", Encoder::Pdf, ".pdf"),
    spec("SVG", Encoder::Svg, ".svg"),
    spec("HEIC", Encoder::Heic, ".heic"),
    spec("EXCEL", Encoder::Excel, ".xlsx"),
    spec("WORD", Encoder::Word, ".docx"),
    spec("CSV", Encoder::Csv, ".csv"),
];

/// The entry returned for names that are not registered.
pub const FALLBACK_FORMAT: FormatSpec = spec("JPEG", Encoder::Jpeg, ".jpg");

static INDEX: Lazy<HashMap<&'static str, &'static FormatSpec>> =
    Lazy::new(|| FORMATS.iter().map(|f| (f.name, f)).collect());

/// Strict lookup. The name is uppercased first.
pub fn lookup(name: &str) -> Option<&'static FormatSpec> {
    INDEX.get(name.trim().to_ascii_uppercase().as_str()).copied()
}

/// Lenient lookup: unknown names resolve to JPEG with a `.jpg` extension.
///
/// Callers that want unknown names rejected use [`lookup`] or configure
/// [`crate::config::UnknownFormatPolicy::Reject`].
pub fn resolve(name: &str) -> &'static FormatSpec {
    lookup(name).unwrap_or(&FALLBACK_FORMAT)
}

/// Registered format names in display order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FORMATS.iter().map(|f| f.name)
}

// ── Input classification ─────────────────────────────────────────────────

/// Input extensions the engine recognises (lowercase, with leading dot).
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".jfif", ".bmp", ".gif", ".tiff", ".webp", ".ico", ".ppm", ".tga",
    ".jp2", ".pdf", ".svg", ".heic", ".xlsx", ".xls", ".doc", ".docx", ".csv",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[".doc", ".docx", ".xlsx", ".xls", ".csv"];

/// Classification of a source file, derived from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputClass {
    RasterImage,
    Pdf,
    DocumentContainer,
}

impl InputClass {
    /// Classify a path. Anything that is neither `.pdf` nor a document
    /// container (including a missing extension) is treated as a raster image.
    pub fn from_path(path: &Path) -> Self {
        match dotted_extension(path).as_deref() {
            Some(".pdf") => InputClass::Pdf,
            Some(ext) if DOCUMENT_EXTENSIONS.contains(&ext) => InputClass::DocumentContainer,
            _ => InputClass::RasterImage,
        }
    }

    /// Whether an encoder's family is an acceptable target for this class.
    ///
    /// PDFs are routed to the page rasteriser unconditionally; a document
    /// target there fails page by page at encode time.
    pub fn accepts(self, encoder: Encoder) -> bool {
        match self {
            InputClass::Pdf => true,
            InputClass::DocumentContainer => encoder.is_document(),
            InputClass::RasterImage => !encoder.is_document(),
        }
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputClass::RasterImage => "image",
            InputClass::Pdf => "PDF",
            InputClass::DocumentContainer => "document",
        };
        f.write_str(s)
    }
}

/// Whether a path carries one of [`SUPPORTED_INPUT_EXTENSIONS`].
pub fn is_supported_input(path: &Path) -> bool {
    dotted_extension(path)
        .map(|ext| SUPPORTED_INPUT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_jpeg() {
        let f = resolve("NOT_A_FORMAT");
        assert_eq!(f.encoder, Encoder::Jpeg);
        assert_eq!(f.encoder.id(), "RASTER_JPEG");
        assert_eq!(f.extension, ".jpg");
        assert!(lookup("NOT_A_FORMAT").is_none());
    }

    #[test]
    fn lookup_is_case_normalised() {
        assert_eq!(resolve("png").encoder, Encoder::Png);
        assert_eq!(resolve(" Webp ").extension, ".webp");
    }

    #[test]
    fn aliases_share_encoder() {
        for name in ["JPEG", "JPG", "JPGE"] {
            assert_eq!(resolve(name).extension, ".jpg");
        }
        assert_eq!(resolve("JFIF").encoder, Encoder::Jpeg);
        assert_eq!(resolve("JFIF").extension, ".jfif");
        assert_eq!(resolve("JPEG2000").encoder.id(), "RASTER_JP2");
    }

    #[test]
    fn names_are_unique_and_ordered() {
        let all: Vec<_> = names().collect();
        assert_eq!(all.first(), Some(&"JPEG"));
        assert_eq!(all.last(), Some(&"CSV"));
        let mut dedup = all.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), all.len());
    }

    #[test]
    fn document_family() {
        assert!(Encoder::Excel.is_document());
        assert!(Encoder::Word.is_document());
        assert!(Encoder::Csv.is_document());
        assert!(!Encoder::Pdf.is_document());
        assert!(!Encoder::Svg.is_document());
    }

    #[test]
    fn opaque_encoders() {
        assert!(Encoder::Jpeg.requires_opaque());
        assert!(Encoder::Jpeg2000.requires_opaque());
        assert!(Encoder::Heic.requires_opaque());
        assert!(!Encoder::Png.requires_opaque());
    }

    #[test]
    fn classify_by_extension() {
        assert_eq!(InputClass::from_path(Path::new("a/b.PDF")), InputClass::Pdf);
        for ext in ["doc", "docx", "xlsx", "xls", "csv"] {
            let p = format!("report.{ext}");
            assert_eq!(
                InputClass::from_path(Path::new(&p)),
                InputClass::DocumentContainer,
                "{p}"
            );
        }
        assert_eq!(InputClass::from_path(Path::new("x.png")), InputClass::RasterImage);
        assert_eq!(InputClass::from_path(Path::new("x.unknown")), InputClass::RasterImage);
        assert_eq!(InputClass::from_path(Path::new("noext")), InputClass::RasterImage);
    }

    #[test]
    fn family_guards() {
        assert!(!InputClass::RasterImage.accepts(Encoder::Excel));
        assert!(!InputClass::DocumentContainer.accepts(Encoder::Jpeg));
        assert!(InputClass::DocumentContainer.accepts(Encoder::Csv));
        assert!(InputClass::RasterImage.accepts(Encoder::Svg));
        assert!(InputClass::Pdf.accepts(Encoder::Png));
    }

    #[test]
    fn supported_inputs() {
        assert!(is_supported_input(Path::new("photo.JPEG")));
        assert!(is_supported_input(Path::new("sheet.xls")));
        assert!(!is_supported_input(Path::new("notes.txt")));
        assert!(!is_supported_input(Path::new("Makefile")));
    }
}
