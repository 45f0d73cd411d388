use crate::surface::Surface;
use anyhow::{Context, Result};
use image::{ImageBuffer, ImageOutputFormat, Rgba};
use std::io::Cursor;

/// Encode the surface's RGBA contents as a PNG byte buffer.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(surface.width(), surface.height(), surface.pixels().to_vec())
            .context("surface buffer does not match its dimensions")?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .context("encode surface as png")?;
    Ok(bytes)
}
