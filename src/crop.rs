use crate::surface::Surface;
use anyhow::{bail, Result};

/// Copy the smallest rectangle of `surface` that contains every pixel with
/// non-zero alpha.
///
/// A fully transparent surface has no such rectangle; that case is an
/// explicit error rather than a degenerate region.
pub fn crop_to_content(surface: &Surface) -> Result<Surface> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.pixel(x, y).a == 0 {
                continue;
            }
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if !found {
        bail!("surface has no visible content to crop to");
    }

    let region = surface.snapshot(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    Ok(Surface::from_pixels(
        region.width(),
        region.height(),
        region.pixels().to_vec(),
    ))
}
