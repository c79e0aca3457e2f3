use palette::Srgb;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An opaque sRGB color, written and parsed as `#rrggbb` (or `#rgb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct Color(Srgb<u8>);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color '{0}'")]
pub struct ParseColorError(String);

impl Color {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn components(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }

    /// The `rgb(r, g, b)` form a browser reports for an inline background color.
    pub fn css_rgb(&self) -> String {
        let (r, g, b) = self.components();
        format!("rgb({}, {}, {})", r, g, b)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self(c)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with('#') {
            return Err(ParseColorError(s.to_string()));
        }
        Srgb::<u8>::from_str(trimmed)
            .map(Self)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

pub const DEFAULT_COLORS: [Color; 16] = [
    Color::from_rgb(0xff, 0x63, 0x84),
    Color::from_rgb(0x36, 0xa2, 0xeb),
    Color::from_rgb(0xff, 0xce, 0x56),
    Color::from_rgb(0x4b, 0xc0, 0xc0),
    Color::from_rgb(0x99, 0x66, 0xff),
    Color::from_rgb(0xff, 0x9f, 0x40),
    Color::from_rgb(0x8b, 0xc3, 0x4a),
    Color::from_rgb(0xe9, 0x1e, 0x63),
    Color::from_rgb(0x00, 0x96, 0x88),
    Color::from_rgb(0x3f, 0x51, 0xb5),
    Color::from_rgb(0xcd, 0xdc, 0x39),
    Color::from_rgb(0x79, 0x55, 0x48),
    Color::from_rgb(0x60, 0x7d, 0x8b),
    Color::from_rgb(0xff, 0x57, 0x22),
    Color::from_rgb(0x9c, 0x27, 0xb0),
    Color::from_rgb(0x21, 0x96, 0xf3),
];

/// Ordered default colors, looked up cyclically by a section's position in the
/// caller's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl ColorPalette {
    /// An empty list falls back to the default colors.
    pub fn new(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color_for_index(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// An explicit color wins; otherwise the positional default.
    pub fn resolve(&self, explicit: Option<Color>, index: usize) -> Color {
        explicit.unwrap_or_else(|| self.color_for_index(index))
    }
}
