//! Stroke and background colors.
//!
//! Hosts hand colors over as strings: either a name from a small
//! vocabulary or a `#RRGGBB` / `#AARRGGBB` hex literal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{SignatureError, SignatureResult};

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Muted gray used for the baseline guide.
    pub const GUIDE_GRAY: Self = Self::rgba(0x88, 0x88, 0x88, 120);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color is fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Parse a named color or a hex literal.
    ///
    /// Names are matched case-insensitively after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnparseableColor`] if the input is neither a
    /// known name nor a `#RRGGBB` / `#AARRGGBB` literal.
    pub fn parse(input: &str) -> SignatureResult<Self> {
        let trimmed = input.trim();
        if let Some(color) = Self::from_name(trimmed) {
            return Ok(color);
        }
        trimmed
            .strip_prefix('#')
            .and_then(Self::from_hex_digits)
            .ok_or_else(|| SignatureError::UnparseableColor(input.to_string()))
    }

    /// Look up a color by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "red" => Self::rgb(0xFF, 0x00, 0x00),
            "blue" => Self::rgb(0x00, 0x00, 0xFF),
            "black" => Self::BLACK,
            "green" => Self::rgb(0x00, 0xFF, 0x00),
            "white" => Self::WHITE,
            "gray" | "grey" => Self::rgb(0x88, 0x88, 0x88),
            "darkgray" | "darkgrey" => Self::rgb(0x44, 0x44, 0x44),
            "lightgray" | "lightgrey" => Self::rgb(0xCC, 0xCC, 0xCC),
            "yellow" => Self::rgb(0xFF, 0xFF, 0x00),
            "cyan" => Self::rgb(0x00, 0xFF, 0xFF),
            "magenta" => Self::rgb(0xFF, 0x00, 0xFF),
            "transparent" | "clear" => Self::TRANSPARENT,
            "purple" => Self::rgb(0x80, 0x00, 0x80),
            "brown" => Self::rgb(0xA5, 0x2A, 0x2A),
            "orange" => Self::rgb(0xFF, 0xA5, 0x00),
            _ => return None,
        };
        Some(color)
    }

    /// Decode `RRGGBB` or `AARRGGBB` (without the leading `#`).
    fn from_hex_digits(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let [b3, b2, b1, b0] = value.to_be_bytes();
        match digits.len() {
            6 => Some(Self::rgb(b2, b1, b0)),
            8 => Some(Self::rgba(b2, b1, b0, b3)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.a, self.r, self.g, self.b
            )
        }
    }
}

impl std::str::FromStr for Color {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::parse("red").expect("red"), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("Grey").expect("grey"), Color::rgb(0x88, 0x88, 0x88));
        assert_eq!(Color::parse(" ORANGE ").expect("orange"), Color::rgb(0xFF, 0xA5, 0x00));
        assert_eq!(Color::parse("clear").expect("clear"), Color::TRANSPARENT);
        assert_eq!(
            Color::parse("lightgrey").expect("lightgrey"),
            Color::parse("lightgray").expect("lightgray")
        );
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Color::parse("#1A2B3C").expect("hex"), Color::rgb(0x1A, 0x2B, 0x3C));
        assert_eq!(Color::parse("#abcdef").expect("hex"), Color::rgb(0xAB, 0xCD, 0xEF));
        assert_eq!(
            Color::parse("#80FF0000").expect("argb"),
            Color::rgba(0xFF, 0x00, 0x00, 0x80)
        );
    }

    #[test]
    fn test_unparseable_colors() {
        for input in ["not-a-color", "", "#", "#12345", "#GGGGGG", "123456", "#+12345"] {
            assert!(
                matches!(Color::parse(input), Err(SignatureError::UnparseableColor(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_display_roundtrip() {
        let color = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(color.to_string().parse::<Color>().expect("parse"), color);

        let translucent = Color::rgba(1, 2, 3, 4);
        assert_eq!(translucent.to_string(), "#04010203");
    }
}
