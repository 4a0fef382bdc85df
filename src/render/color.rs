use image::Rgba;

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        3 => {
            let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgba([short(0)?, short(1)?, short(2)?, 255]))
        }
        6 => Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255])),
        8 => Some(Rgba([
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        ])),
        _ => None,
    }
}

/// Parse `value`, or `fallback` when it is not a usable color.
pub fn parse_or(value: &str, fallback: &str) -> Rgba<u8> {
    parse_hex(value)
        .or_else(|| {
            log::debug!("Ignoring unparseable color {value:?}, using {fallback}");
            parse_hex(fallback)
        })
        .unwrap_or(Rgba([0, 0, 0, 255]))
}

pub fn to_hex(color: Rgba<u8>) -> String {
    let Rgba([r, g, b, a]) = color;
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}
