//! Turns an encoded payload plus a [`Customization`] into a downloadable image.

pub mod color;
pub mod frame;
pub mod logo;

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::QrCode;
use qrcode::types::QrError;
use qrcode::render::svg;
use serde::Deserialize;

use crate::models::customization::{Customization, DEFAULT_BG_COLOR, DEFAULT_FG_COLOR};
use crate::payload::QrKind;

/// Canvas size used by the preview.
pub const DEFAULT_SIZE: u32 = 220;
pub const MIN_SIZE: u32 = 64;
pub const MAX_SIZE: u32 = 2048;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

/// `basic` downloads are named by kind; `pro` adds a timestamp.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportVariant {
    #[default]
    Basic,
    Pro,
}

pub fn export_file_name(kind: QrKind, variant: ExportVariant, format: ExportFormat) -> String {
    match variant {
        ExportVariant::Basic => format!("qrcode-{}.{}", kind, format.extension()),
        ExportVariant::Pro => format!(
            "qrcode-{}-{}.{}",
            kind,
            chrono::Utc::now().timestamp_millis(),
            format.extension()
        ),
    }
}

pub fn clamp_size(size: Option<u32>) -> u32 {
    size.unwrap_or(DEFAULT_SIZE).clamp(MIN_SIZE, MAX_SIZE)
}

/// The payload does not fit the largest QR version at the chosen error level.
pub fn is_data_too_long(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<QrError>(), Some(QrError::DataTooLong))
}

fn build_code(payload: &str, customization: &Customization) -> Result<QrCode> {
    QrCode::with_error_correction_level(payload.as_bytes(), customization.error_level.into())
        .context("QR code generation error")
}

pub fn render_image(payload: &str, customization: &Customization, size: u32) -> Result<RgbaImage> {
    let code = build_code(payload, customization)?;
    let dark = color::parse_or(&customization.fg_color, DEFAULT_FG_COLOR);
    let light = color::parse_or(&customization.bg_color, DEFAULT_BG_COLOR);

    let mut canvas = code
        .render::<Rgba<u8>>()
        .dark_color(dark)
        .light_color(light)
        .quiet_zone(true)
        .min_dimensions(size, size)
        .build();

    if customization.has_logo() {
        match logo::decode_data_url(&customization.logo_url) {
            Ok(image) => {
                let side = customization.logo_size * canvas.width() / DEFAULT_SIZE;
                logo::overlay_centered(&mut canvas, &image, side, light);
            }
            Err(e) => log::debug!("Skipping logo: {:#}", e),
        }
    }

    Ok(canvas)
}

pub fn render_png(payload: &str, customization: &Customization, size: u32) -> Result<Vec<u8>> {
    let canvas = render_image(payload, customization, size)?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

/// Vector export. Logos are left out; frames are drawn.
pub fn render_svg(payload: &str, customization: &Customization, size: u32) -> Result<String> {
    let code = build_code(payload, customization)?;
    let dark = color::to_hex(color::parse_or(&customization.fg_color, DEFAULT_FG_COLOR));
    let light = color::to_hex(color::parse_or(&customization.bg_color, DEFAULT_BG_COLOR));

    let svg = code
        .render::<svg::Color>()
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .quiet_zone(true)
        .min_dimensions(size, size)
        .build();

    Ok(frame::wrap(&svg, customization))
}

pub fn render(
    payload: &str,
    customization: &Customization,
    size: u32,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Png => render_png(payload, customization, size),
        ExportFormat::Svg => render_svg(payload, customization, size).map(String::into_bytes),
    }
}
