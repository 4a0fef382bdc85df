//! Text frames around an SVG code, laid out like the live preview:
//! a band above and/or below the code, an optional border, or a pill-shaped
//! banner underneath.

use crate::models::customization::{Customization, FrameStyle};
use crate::render::color;

/// Preview canvas width the band height below was designed against.
const REFERENCE_SIZE: u32 = 220;
const REFERENCE_BAND: u32 = 40;
const REFERENCE_BORDER: u32 = 4;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Read the `width`/`height` attributes of the root `<svg>` element.
pub fn svg_dimensions(svg: &str) -> Option<(u32, u32)> {
    let start = svg.find("<svg")?;
    let tag_end = start + svg[start..].find('>')?;
    let tag = &svg[start..tag_end];

    let attr = |name: &str| -> Option<u32> {
        let needle = format!(" {name}=\"");
        let value_start = tag.find(&needle)? + needle.len();
        let value_len = tag[value_start..].find('"')?;
        tag[value_start..value_start + value_len].parse().ok()
    };
    Some((attr("width")?, attr("height")?))
}

fn strip_xml_declaration(svg: &str) -> &str {
    match svg.find("<svg") {
        Some(start) => &svg[start..],
        None => svg,
    }
}

/// Wrap the rendered code in a frame. Returns the input unchanged when the
/// customization has no frame to draw.
pub fn wrap(svg: &str, customization: &Customization) -> String {
    if !customization.has_frame() {
        return svg.to_string();
    }
    let Some((width, height)) = svg_dimensions(svg) else {
        log::warn!("Rendered SVG has no dimensions, skipping frame");
        return svg.to_string();
    };

    let band = (width * REFERENCE_BAND / REFERENCE_SIZE).max(16);
    let border = (width * REFERENCE_BORDER / REFERENCE_SIZE).max(2);
    let frame_color = color::to_hex(color::parse_or(&customization.frame_color, "#000000"));
    let text_color = color::to_hex(color::parse_or(&customization.frame_text_color, "#ffffff"));
    let text = escape_xml(&customization.frame_text);
    let font_size = band * 2 / 5;

    let label = |y: u32| {
        format!(
            "<text x=\"{x}\" y=\"{y}\" fill=\"{text_color}\" font-family=\"sans-serif\" \
             font-weight=\"bold\" font-size=\"{font_size}\" text-anchor=\"middle\" \
             dominant-baseline=\"central\">{text}</text>",
            x = width / 2,
        )
    };
    let band_rect = |y: u32| {
        format!("<rect x=\"0\" y=\"{y}\" width=\"{width}\" height=\"{band}\" fill=\"{frame_color}\"/>")
    };

    let (code_y, total_height, decorations) = match customization.frame_style {
        FrameStyle::None => return svg.to_string(),
        FrameStyle::TopText => (band, height + band, band_rect(0) + &label(band / 2)),
        FrameStyle::BottomText => (0, height + band, band_rect(height) + &label(height + band / 2)),
        FrameStyle::FullBorder => {
            let half = border / 2;
            let outline = format!(
                "<rect x=\"{half}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"none\" \
                 stroke=\"{frame_color}\" stroke-width=\"{border}\"/>",
                y = band + half,
                w = width - border,
                h = height - border,
            );
            (band, height + band, band_rect(0) + &label(band / 2) + &outline)
        }
        FrameStyle::Banner => {
            let gap = band / 5;
            let pill_width = width * 4 / 5;
            let pill = format!(
                "<rect x=\"{x}\" y=\"{y}\" width=\"{pill_width}\" height=\"{band}\" rx=\"{r}\" \
                 fill=\"{frame_color}\"/>",
                x = (width - pill_width) / 2,
                y = height + gap,
                r = band / 2,
            );
            (0, height + gap + band, pill + &label(height + gap + band / 2))
        }
    };

    format!(
        "<?xml version=\"1.0\" standalone=\"yes\"?>\
         <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" \
         height=\"{total_height}\" viewBox=\"0 0 {width} {total_height}\">\
         <g transform=\"translate(0 {code_y})\">{inner}</g>{decorations}</svg>",
        inner = strip_xml_declaration(svg),
    )
}
