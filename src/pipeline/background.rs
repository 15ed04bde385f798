//! Background removal by flat color keying.
//!
//! Every pixel whose R, G and B channels are each strictly closer than
//! `tolerance` to the reference color has its alpha set to 0. Nothing else
//! changes: there is no connectivity analysis, so background-colored pixels
//! inside the subject are cleared too, and a pixel's RGB values are kept even
//! when it becomes transparent.

use crate::config::BackgroundKey;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Convert to RGBA and key out pixels near `key.color`.
pub fn remove_background(image: DynamicImage, key: BackgroundKey) -> RgbaImage {
    let mut rgba = image.into_rgba8();
    let cleared = key_out(&mut rgba, key);
    debug!(
        "Keyed out {} of {} pixels",
        cleared,
        rgba.width() as u64 * rgba.height() as u64
    );
    rgba
}

/// Clear alpha in place; returns the number of pixels made transparent.
pub fn key_out(image: &mut RgbaImage, key: BackgroundKey) -> usize {
    let [r, g, b] = key.color;
    let mut cleared = 0;
    for px in image.pixels_mut() {
        let [pr, pg, pb, _] = px.0;
        if pr.abs_diff(r) < key.tolerance
            && pg.abs_diff(g) < key.tolerance
            && pb.abs_diff(b) < key.tolerance
        {
            px.0[3] = 0;
            cleared += 1;
        }
    }
    cleared
}
