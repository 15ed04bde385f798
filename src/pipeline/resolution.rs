//! Embedded resolution probe.
//!
//! The `image` decoders do not surface physical resolution. PNG `pHYs` is
//! read through the `png` header reader; the JFIF `APP0` density fields are
//! read straight from the encoded bytes. Only the horizontal density is
//! returned; the PDF writer applies it to both axes.

use std::io::Cursor;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const INCHES_PER_METRE: f32 = 0.0254;
const CM_PER_INCH: f32 = 2.54;

/// Horizontal DPI recorded in the encoded image, if any.
pub fn embedded_dpi(bytes: &[u8]) -> Option<f32> {
    let dpi = if bytes.starts_with(PNG_SIGNATURE) {
        png_dpi(bytes)
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        jfif_dpi(bytes)
    } else {
        None
    }?;
    (dpi.is_finite() && dpi > 0.0).then_some(dpi)
}

fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

fn png_dpi(bytes: &[u8]) -> Option<f32> {
    // pHYs must precede IDAT, so the header pass is enough.
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().ok()?;
    let dims = reader.info().pixel_dims?;
    // An unspecified unit only states an aspect ratio.
    (dims.unit == png::Unit::Meter).then(|| (dims.xppu as f32 * INCHES_PER_METRE).round())
}

fn jfif_dpi(bytes: &[u8]) -> Option<f32> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        let len = be_u16(&bytes[pos + 2..]) as usize;
        let seg_start = pos + 4;
        let seg_end = (pos + 2).checked_add(len)?;
        if len < 2 || seg_end > bytes.len() {
            return None;
        }
        match marker {
            0xE0 if len >= 14 && &bytes[seg_start..seg_start + 5] == b"JFIF\0" => {
                let units = bytes[seg_start + 7];
                let x_density = be_u16(&bytes[seg_start + 8..]) as f32;
                return match units {
                    1 => Some(x_density),
                    2 => Some((x_density * CM_PER_INCH).round()),
                    _ => None,
                };
            }
            // Start of scan: no more header segments.
            0xDA => return None,
            _ => {}
        }
        pos = seg_end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_phys(ppm: u32, unit: png::Unit) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, 2, 2);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit,
        }));
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0; 4]).unwrap();
        writer.finish().unwrap();
        out
    }

    fn jfif(units: u8, density: u16) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        out.extend_from_slice(b"JFIF\0");
        out.extend_from_slice(&[1, 1, units]);
        out.extend_from_slice(&density.to_be_bytes());
        out.extend_from_slice(&density.to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        out
    }

    #[test]
    fn png_phys_in_metres() {
        // 11811 px/m ≈ 300 dpi, 5906 px/m ≈ 150 dpi
        assert_eq!(embedded_dpi(&png_with_phys(11811, png::Unit::Meter)), Some(300.0));
        assert_eq!(embedded_dpi(&png_with_phys(5906, png::Unit::Meter)), Some(150.0));
    }

    #[test]
    fn png_phys_without_unit_is_ignored() {
        assert_eq!(embedded_dpi(&png_with_phys(11811, png::Unit::Unspecified)), None);
    }

    #[test]
    fn jfif_density() {
        assert_eq!(embedded_dpi(&jfif(1, 72)), Some(72.0));
        assert_eq!(embedded_dpi(&jfif(2, 118)), Some(300.0));
        assert_eq!(embedded_dpi(&jfif(0, 1)), None);
    }

    #[test]
    fn image_crate_png_has_no_density() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(embedded_dpi(&buf), None);
    }

    #[test]
    fn garbage_and_truncation() {
        assert_eq!(embedded_dpi(b""), None);
        assert_eq!(embedded_dpi(b"GIF89a"), None);
        let mut png = png_with_phys(11811, png::Unit::Meter);
        png.truncate(20);
        assert_eq!(embedded_dpi(&png), None);
    }
}
