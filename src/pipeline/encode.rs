//! Per-image encode: color-model coercion, encoder selection, and write.
//!
//! Shared by the raster converter (one image per file) and the PDF rasteriser
//! (one image per page) so both apply identical rules:
//!
//! | encoder | handling |
//! |---|---|
//! | JPEG | forced to opaque RGB, quality 100 |
//! | JPEG 2000, HEIC | forced to opaque RGB; no encoder in this build |
//! | PDF | single page via the PDF backend at the embedded or fallback DPI |
//! | SVG | white background keyed out (tolerance 30), PNG embedded as base64 |
//! | PNG | any integer color type, 16-bit kept |
//! | TIFF | gray+alpha widened to RGBA, 16-bit kept |
//! | GIF | widened to RGBA8 unless already RGB8/RGBA8 |
//! | PPM | binary pixmap; gray widened to RGB8, alpha rejected |
//! | ICO | downscaled to fit 256 × 256 |
//! | BMP, WebP, TGA, ICO | reduced to 8 bits per channel |
//! | documents | rejected: no raster encoding exists |

use crate::config::{BackgroundKey, ConversionConfig};
use crate::format::{Encoder, FormatSpec};
use crate::pipeline::render::PdfBackend;
use crate::pipeline::{svg, write};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const ICO_MAX_EDGE: u32 = 256;
const JPEG_QUALITY: u8 = 100;

/// Why an image could not be emitted.
#[derive(Debug)]
pub enum EmitError {
    /// The encoder rejected the pixel buffer or does not exist.
    Encode(String),
    /// The encoded bytes could not be written.
    Write(std::io::Error),
}

/// Everything an encode needs besides the image itself.
pub struct EncodeContext<'a> {
    pub config: &'a ConversionConfig,
    pub backend: &'a dyn PdfBackend,
}

/// Convert `image` into a color type `encoder` can write.
///
/// Encoders that cannot carry alpha get 8-bit RGB. The others keep alpha
/// where the source has it and are only widened or narrowed as far as the
/// codec needs. RGBA and gray+alpha sources stay as they are for PPM, which
/// then rejects them.
pub fn coerce_for(image: DynamicImage, encoder: Encoder) -> DynamicImage {
    let before = image.color();
    let coerced = match encoder {
        e if e.requires_opaque() => match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.into_rgb8()),
        },
        Encoder::Png => match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => eight_bit(image),
            other => other,
        },
        Encoder::Tiff => match image {
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageRgba8(image.into_rgba8()),
            DynamicImage::ImageLumaA16(_) => DynamicImage::ImageRgba16(image.into_rgba16()),
            other => other,
        },
        Encoder::Gif => match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.into_rgba8()),
        },
        Encoder::Ppm => match eight_bit(image) {
            gray @ DynamicImage::ImageLuma8(_) => DynamicImage::ImageRgb8(gray.into_rgb8()),
            other => other,
        },
        Encoder::Bmp | Encoder::WebP | Encoder::Ico | Encoder::Tga => eight_bit(image),
        _ => image,
    };
    if coerced.color() != before {
        debug!("Coerced {:?} to {:?} for {}", before, coerced.color(), encoder);
    }
    coerced
}

/// Narrow to 8 bits per channel, keeping the channel layout.
fn eight_bit(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(image.into_luma8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLumaA8(image.into_luma_alpha8()),
        DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => {
            DynamicImage::ImageRgb8(image.into_rgb8())
        }
        other => DynamicImage::ImageRgba8(other.into_rgba8()),
    }
}

/// Encode `image` for `format` and write it to `out_path`.
///
/// `dpi` is the resolution embedded in the source, if any; only the PDF
/// encoder uses it. Returns a warning when a failure was logged and
/// swallowed instead of returned (SVG writes under the default policy).
pub fn emit(
    image: DynamicImage,
    format: &FormatSpec,
    out_path: &Path,
    dpi: Option<f32>,
    ctx: &EncodeContext<'_>,
) -> Result<Option<String>, EmitError> {
    let image = coerce_for(image, format.encoder);

    if format.encoder == Encoder::Svg {
        return svg::export_svg(
            image,
            out_path,
            BackgroundKey::default(),
            ctx.config.svg_write_failure,
        )
        .map_err(|e| match e {
            svg::SvgError::Encode(e) => EmitError::Encode(e.to_string()),
            svg::SvgError::Write(e) => EmitError::Write(e),
        });
    }

    let dpi = dpi.unwrap_or(ctx.config.fallback_dpi);
    let bytes = encode_to_vec(&image, format.encoder, dpi, ctx).map_err(EmitError::Encode)?;
    debug!("Encoded {} → {} bytes", format.encoder, bytes.len());

    write::write_atomic(out_path, &bytes).map_err(EmitError::Write)?;
    Ok(None)
}

/// Encode to an in-memory buffer. SVG is handled by [`emit`].
pub fn encode_to_vec(
    image: &DynamicImage,
    encoder: Encoder,
    dpi: f32,
    ctx: &EncodeContext<'_>,
) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let result = match encoder {
        Encoder::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
        }
        Encoder::Ppm => image.write_with_encoder(
            PnmEncoder::new(&mut buf).with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary)),
        ),
        Encoder::Ico if image.width() > ICO_MAX_EDGE || image.height() > ICO_MAX_EDGE => image
            .thumbnail(ICO_MAX_EDGE, ICO_MAX_EDGE)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Ico),
        Encoder::Png => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png),
        Encoder::Bmp => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp),
        Encoder::Gif => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif),
        Encoder::Tiff => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff),
        Encoder::WebP => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP),
        Encoder::Ico => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Ico),
        Encoder::Tga => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tga),
        Encoder::Pdf => return ctx.backend.image_to_pdf(image, dpi),
        Encoder::Jpeg2000 | Encoder::Heic => {
            return Err(format!("no {} encoder is available", encoder));
        }
        Encoder::Excel | Encoder::Word | Encoder::Csv => {
            return Err(format!("{} cannot store raster images", encoder));
        }
        Encoder::Svg => return Err("SVG output is written by the SVG exporter".into()),
    };
    result.map_err(|e| e.to_string())?;
    Ok(buf)
}
