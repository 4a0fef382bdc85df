use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Decode a `data:image/...;base64,` URI into an image.
pub fn decode_data_url(url: &str) -> Result<DynamicImage> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .context("Logo is not a data URL")?;
    let (header, data) = rest.split_once(',').context("Malformed data URL")?;
    if !header.starts_with("image/") || !header.ends_with(";base64") {
        bail!("Unsupported data URL header: {header}");
    }

    let bytes = STANDARD.decode(data.trim()).context("Invalid base64 logo")?;
    image::load_from_memory(&bytes).context("Unreadable logo image")
}

/// Clear a `side`x`side` square in the middle of `canvas` to `background`
/// and draw `logo` scaled into it.
pub fn overlay_centered(canvas: &mut RgbaImage, logo: &DynamicImage, side: u32, background: Rgba<u8>) {
    let side = side.min(canvas.width()).min(canvas.height());
    if side == 0 {
        return;
    }
    let x = (canvas.width() - side) / 2;
    let y = (canvas.height() - side) / 2;

    for py in y..y + side {
        for px in x..x + side {
            canvas.put_pixel(px, py, background);
        }
    }

    let scaled = logo.resize(side, side, FilterType::Triangle).to_rgba8();
    let offset_x = x + (side - scaled.width()) / 2;
    let offset_y = y + (side - scaled.height()) / 2;
    imageops::overlay(canvas, &scaled, offset_x.into(), offset_y.into());
}
