use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};

/// Re-encodes an inbound photo as RGBA PNG. The variation endpoint only
/// accepts alpha-capable containers, while the platform serves photos as
/// JPEG; any decodable inbound encoding is accepted.
pub fn to_rgba_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).context("decoding inbound photo")?;
    let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());

    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, ImageFormat::Png)
        .context("re-encoding photo as PNG")?;
    Ok(out.into_inner())
}
