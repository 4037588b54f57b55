//! Color parsing for render backends.
//!
//! Lowered colors are CSS-style strings: `#RRGGBBAA`, `#RRGGBB`, or one
//! of the named colors the configuration defaults use. Backends parse
//! them once per paint.

/// A straight-alpha sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex or named color. Returns `None` for anything
    /// unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        Self::named(s)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range).and_then(|c| u8::from_str_radix(c, 16).ok())
        };
        match hex.len() {
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    fn named(name: &str) -> Option<Self> {
        let rgb = match name.to_ascii_lowercase().as_str() {
            "black" => (0x00, 0x00, 0x00),
            "white" => (0xFF, 0xFF, 0xFF),
            "red" => (0xFF, 0x00, 0x00),
            "green" => (0x00, 0x80, 0x00),
            "blue" => (0x00, 0x00, 0xFF),
            "yellow" => (0xFF, 0xFF, 0x00),
            "gray" | "grey" => (0x80, 0x80, 0x80),
            "lightgray" | "lightgrey" => (0xD3, 0xD3, 0xD3),
            "darkgray" | "darkgrey" => (0xA9, 0xA9, 0xA9),
            "silver" => (0xC0, 0xC0, 0xC0),
            "transparent" => return Some(Self::new(0, 0, 0, 0)),
            _ => return None,
        };
        Some(Self::new(rgb.0, rgb.1, rgb.2, 255))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_with_alpha() {
        assert_eq!(
            Rgba::parse("#0080C0FF"),
            Some(Rgba::new(0x00, 0x80, 0xC0, 0xFF))
        );
        assert_eq!(
            Rgba::parse("#A1B2C380"),
            Some(Rgba::new(0xA1, 0xB2, 0xC3, 0x80))
        );
    }

    #[test]
    fn test_parse_hex_opaque() {
        assert_eq!(Rgba::parse("#112233"), Some(Rgba::new(0x11, 0x22, 0x33, 255)));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgba::parse("white"), Some(Rgba::new(255, 255, 255, 255)));
        assert_eq!(Rgba::parse("lightgray"), Some(Rgba::new(0xD3, 0xD3, 0xD3, 255)));
        assert_eq!(Rgba::parse("nope"), None);
    }

    #[test]
    fn test_parse_rejects_malformed_hex() {
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#GGHHII"), None);
    }
}
