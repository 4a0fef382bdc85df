use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    #[default]
    Square,
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
    ExtraRounded,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CornerStyle {
    #[default]
    Square,
    Rounded,
    ExtraRounded,
}

/// Higher levels survive more damage (and a logo on top) at the cost of capacity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<ErrorLevel> for EcLevel {
    fn from(level: ErrorLevel) -> Self {
        match level {
            ErrorLevel::L => EcLevel::L,
            ErrorLevel::M => EcLevel::M,
            ErrorLevel::Q => EcLevel::Q,
            ErrorLevel::H => EcLevel::H,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStyle {
    #[default]
    None,
    BottomText,
    TopText,
    FullBorder,
    Banner,
}

/// Presentation settings handed to the renderer. Independent of the payload.
///
/// Colors and the logo URL are taken as-is; the renderer falls back to
/// defaults when it cannot make sense of them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Customization {
    pub fg_color: String,
    pub bg_color: String,
    pub dot_style: DotStyle,
    pub corner_style: CornerStyle,
    pub error_level: ErrorLevel,
    pub logo_url: String,
    #[validate(range(min = 30, max = 100, message = "Logo size must be between 30 and 100 px"))]
    pub logo_size: u32,
    pub frame_style: FrameStyle,
    pub frame_text: String,
    pub frame_color: String,
    pub frame_text_color: String,
}

pub const DEFAULT_FG_COLOR: &str = "#000000";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";

impl Default for Customization {
    fn default() -> Self {
        Self {
            fg_color: DEFAULT_FG_COLOR.to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            dot_style: DotStyle::Square,
            corner_style: CornerStyle::Square,
            error_level: ErrorLevel::H,
            logo_url: String::new(),
            logo_size: 60,
            frame_style: FrameStyle::None,
            frame_text: String::new(),
            frame_color: "#000000".to_string(),
            frame_text_color: "#ffffff".to_string(),
        }
    }
}

impl Customization {
    pub fn has_logo(&self) -> bool {
        !self.logo_url.trim().is_empty()
    }

    /// Frames are only drawn when there is something to write in them.
    pub fn has_frame(&self) -> bool {
        self.frame_style != FrameStyle::None && !self.frame_text.is_empty()
    }
}
