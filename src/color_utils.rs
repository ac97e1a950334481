//! Color parsing and the seal-ink pixel heuristic
use crate::error::{Result, StampError};
use palette::Srgb;
use std::str::FromStr;
use tiny_skia::Color;

/// Parse a color string into RGBA components
/// Accepts:
/// - "transparent" => (0, 0, 0, 0)
/// - A handful of CSS names used by seal presets ("red", "blue", "white", "black")
/// - #RGB, #RRGGBB (with or without '#') => (r, g, b, 255)
/// - #RRGGBBAA => (r, g, b, a)
pub fn parse_color(color_str: &str) -> Result<(u8, u8, u8, u8)> {
    let trimmed = color_str.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "transparent" => return Ok((0, 0, 0, 0)),
        "red" => return Ok((255, 0, 0, 255)),
        "blue" => return Ok((0, 0, 255, 255)),
        "white" => return Ok((255, 255, 255, 255)),
        "black" => return Ok((0, 0, 0, 255)),
        _ => {}
    }

    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !hex.is_ascii() {
        return Err(StampError::InvalidColor(color_str.to_string()));
    }
    if hex.len() == 8 {
        let rgb: Srgb<u8> = Srgb::from_str(&hex[0..6])
            .map_err(|_| StampError::InvalidColor(color_str.to_string()))?;
        let a = u8::from_str_radix(&hex[6..8], 16)
            .map_err(|_| StampError::InvalidColor(color_str.to_string()))?;
        return Ok((rgb.red, rgb.green, rgb.blue, a));
    }

    let rgb: Srgb<u8> =
        Srgb::from_str(hex).map_err(|_| StampError::InvalidColor(color_str.to_string()))?;
    Ok((rgb.red, rgb.green, rgb.blue, 255))
}

/// Parse a color string straight into a tiny-skia color.
pub fn to_skia_color(color_str: &str) -> Result<Color> {
    let (r, g, b, a) = parse_color(color_str)?;
    Ok(Color::from_rgba8(r, g, b, a))
}

/// Maximum per-channel distance for a pixel to count as seal ink.
pub const INK_TOLERANCE: u8 = 55;
/// Minimum alpha for a pixel to count as seal ink.
pub const INK_MIN_ALPHA: u8 = 200;

/// Decides whether a rendered pixel belongs to the seal's ink.
///
/// Matches against the configured tint, so a pure red seal gets the usual
/// `r > 200, g < 55, b < 55` test and a blue contract seal is aged too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkMatcher {
    rgb: (u8, u8, u8),
}

impl InkMatcher {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { rgb: (r, g, b) }
    }

    pub fn from_color_str(color_str: &str) -> Result<Self> {
        let (r, g, b, _) = parse_color(color_str)?;
        Ok(Self::new(r, g, b))
    }

    /// Test a premultiplied RGBA pixel.
    pub fn matches(&self, px: &[u8]) -> bool {
        let a = px[3];
        if a < INK_MIN_ALPHA {
            return false;
        }
        // Undo premultiplication before comparing
        let channel = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
        channel(px[0]).abs_diff(self.rgb.0) <= INK_TOLERANCE
            && channel(px[1]).abs_diff(self.rgb.1) <= INK_TOLERANCE
            && channel(px[2]).abs_diff(self.rgb.2) <= INK_TOLERANCE
    }
}
