//! Resolved swatch styles and CSS colour parsing.
//!
//! Swatches describe their appearance the way a browser reports a computed
//! style: an optional `background-image` (`url("...")` or `none`) and a
//! `background-color`. [`SwatchStyle::resolve`] turns that pair into a
//! [`Selection`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty colour string")]
    Empty,
    #[error("invalid hex colour `{0}`")]
    InvalidHex(String),
    #[error("invalid colour channel `{0}`")]
    InvalidChannel(String),
    #[error("unsupported colour syntax `{0}`")]
    Unsupported(String),
}

/// An sRGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("orange", 0xffa500),
    ("silver", 0xc0c0c0),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("navy", 0x000080),
    ("maroon", 0x800000),
    ("purple", 0x800080),
    ("teal", 0x008080),
    ("transparent", 0x000000),
];

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parse the colour notations a computed style can report: `#rgb`,
    /// `#rrggbb`, `rgb(...)`, `rgba(...)` and a handful of keywords.
    pub fn parse(css: &str) -> Result<Self, ColorParseError> {
        let css = css.trim().to_ascii_lowercase();
        if css.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = css.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = css
            .strip_prefix("rgba(")
            .or_else(|| css.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| ColorParseError::Unsupported(css.clone()))?;
            return parse_functional(args);
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == css)
            .map(|(_, hex)| Self::from_hex(*hex))
            .ok_or(ColorParseError::Unsupported(css))
    }

    /// Channels converted from the sRGB transfer curve to linear light.
    pub fn to_linear(&self) -> [f32; 3] {
        let linear = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        [linear(self.r), linear(self.g), linear(self.b)]
    }

    pub fn to_hex_string(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

fn parse_hex(hex: &str) -> Result<Rgb, ColorParseError> {
    let invalid = || ColorParseError::InvalidHex(hex.to_string());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(Rgb::from_hex(value)),
        3 => {
            // #abc expands to #aabbcc
            let r = (value >> 8) & 0xf;
            let g = (value >> 4) & 0xf;
            let b = value & 0xf;
            Ok(Rgb::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
        }
        _ => Err(invalid()),
    }
}

fn parse_functional(args: &str) -> Result<Rgb, ColorParseError> {
    let channels = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .take(3)
        .map(parse_channel)
        .collect::<Result<Vec<_>, _>>()?;
    match channels.as_slice() {
        [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
        _ => Err(ColorParseError::Unsupported(args.to_string())),
    }
}

fn parse_channel(part: &str) -> Result<f32, ColorParseError> {
    let invalid = || ColorParseError::InvalidChannel(part.to_string());
    let value = match part.strip_suffix('%') {
        Some(percent) => percent.parse::<f32>().map_err(|_| invalid())? / 100.0,
        None => part.parse::<f32>().map_err(|_| invalid())? / 255.0,
    };
    if value.is_finite() {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(invalid())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex_string()
    }
}

/// Pull the address out of a `url("...")` background-image value.
///
/// Only the double-quoted form is recognised; anything else yields `None`.
pub fn extract_url(background_image: &str) -> Option<&str> {
    let start = background_image.find("url(\"")? + "url(\"".len();
    let rest = &background_image[start..];
    let end = rest.find("\")")?;
    let url = &rest[..end];
    (!url.is_empty()).then_some(url)
}

/// What a swatch click asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Color(Rgb),
    Texture(String),
}

/// The computed background of a clickable swatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwatchStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub background_color: String,
}

impl SwatchStyle {
    pub fn color(css: impl Into<String>) -> Self {
        Self {
            background_image: None,
            background_color: css.into(),
        }
    }

    pub fn image(css: impl Into<String>) -> Self {
        Self {
            background_image: Some(css.into()),
            background_color: String::new(),
        }
    }

    /// A usable `url("...")` background wins; otherwise the background colour
    /// is parsed as a solid colour.
    pub fn resolve(&self) -> Result<Selection, ColorParseError> {
        let url = self
            .background_image
            .as_deref()
            .filter(|image| *image != "none")
            .and_then(extract_url);
        match url {
            Some(url) => Ok(Selection::Texture(url.to_string())),
            None => Rgb::parse(&self.background_color).map(Selection::Color),
        }
    }
}
