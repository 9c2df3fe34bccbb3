//! Parameter types for render specs.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 100). Clamped on construction.
//! - [`OutputFormat`]: Encoded output format. Parsing is case-insensitive and
//!   accepts `jpg` as an alias of `jpeg`.
//! - [`Background`]: Letterbox canvas color parsed from `#RRGGBB` or `#RRGGBBAA`.
//! - [`Anchor`]: Relative placement of a crop box inside the source.
//! - [`ResampleFilter`]: Resampling filter shared by every renderer.

use image::imageops::FilterType;
use image::{ImageFormat, Rgba};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("unsupported output format: {0:?}")]
    UnknownFormat(String),
    #[error("invalid background color {0:?}: expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
    #[error("unknown resample filter: {0:?}")]
    UnknownFilter(String),
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    /// Lossless WebP; quality is ignored.
    WebP,
    Avif,
}

impl OutputFormat {
    /// Normalized codec name (`"JPEG"` for both `jpg` and `jpeg`).
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Gif => "GIF",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Tiff => "TIFF",
            OutputFormat::WebP => "WEBP",
            OutputFormat::Avif => "AVIF",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tif",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Avif => ImageFormat::Avif,
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_uppercase().as_str() {
            "JPG" | "JPEG" => Ok(OutputFormat::Jpeg),
            "PNG" => Ok(OutputFormat::Png),
            "GIF" => Ok(OutputFormat::Gif),
            "BMP" => Ok(OutputFormat::Bmp),
            "TIF" | "TIFF" => Ok(OutputFormat::Tiff),
            "WEBP" => Ok(OutputFormat::WebP),
            "AVIF" => Ok(OutputFormat::Avif),
            _ => Err(ParamError::UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.extension().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Letterbox canvas color.
///
/// `#RRGGBB` strings get a synthesized alpha of zero, so padding is
/// transparent in formats that keep alpha and shows the RGB color in formats
/// that drop it. `#RRGGBBAA` sets alpha explicitly. The default is opaque
/// white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Background(pub Rgba<u8>);

impl Background {
    pub const WHITE: Background = Background(Rgba([255, 255, 255, 255]));

    pub fn parse(text: &str) -> Result<Self, ParamError> {
        let invalid = || ParamError::InvalidColor(text.to_string());
        let hex = text.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0 };
        Ok(Background(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha])))
    }

    pub fn rgba(self) -> Rgba<u8> {
        self.0
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Background {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Background {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Background> for String {
    fn from(bg: Background) -> Self {
        let [r, g, b, a] = bg.0.0;
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Relative crop placement: `(0.0, 0.0)` is top-left, `(0.5, 0.5)` centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };

    /// Build an anchor, clamping both coordinates to `0.0..=1.0`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }

    /// Both coordinates are finite and within `0.0..=1.0`.
    pub fn in_range(self) -> bool {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        unit(self.x) && unit(self.y)
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Resampling filter. Every renderer of one [`CodecConfig`](super::CodecConfig)
/// uses the same filter so output stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ResampleFilter::Nearest),
            "triangle" | "bilinear" => Ok(ResampleFilter::Triangle),
            "catmullrom" | "bicubic" => Ok(ResampleFilter::CatmullRom),
            "gaussian" => Ok(ResampleFilter::Gaussian),
            "lanczos3" | "lanczos" | "antialias" => Ok(ResampleFilter::Lanczos3),
            _ => Err(ParamError::UnknownFilter(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_100() {
        assert_eq!(Quality::default().value(), 100);
    }

    #[test]
    fn jpg_normalizes_to_jpeg() {
        for text in ["jpg", "JPG", "jpeg", ".jpg", "Jpeg"] {
            let format: OutputFormat = text.parse().unwrap();
            assert_eq!(format, OutputFormat::Jpeg, "{text}");
            assert_eq!(format.name(), "JPEG");
        }
    }

    #[test]
    fn other_formats_parse() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("TIF".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert_eq!("avif".parse::<OutputFormat>().unwrap(), OutputFormat::Avif);
    }

    #[test]
    fn unknown_format_is_error() {
        assert_eq!(
            "psd".parse::<OutputFormat>(),
            Err(ParamError::UnknownFormat("psd".into()))
        );
    }

    #[test]
    fn format_extension() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn six_digit_color_has_zero_alpha() {
        let bg = Background::parse("#000000").unwrap();
        assert_eq!(bg.rgba(), Rgba([0, 0, 0, 0]));
        let bg = Background::parse("1a2B3c").unwrap();
        assert_eq!(bg.rgba(), Rgba([0x1a, 0x2b, 0x3c, 0]));
    }

    #[test]
    fn eight_digit_color_keeps_alpha() {
        let bg = Background::parse("#ff000080").unwrap();
        assert_eq!(bg.rgba(), Rgba([255, 0, 0, 0x80]));
    }

    #[test]
    fn default_background_is_opaque_white() {
        assert_eq!(Background::default().rgba(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn invalid_colors_are_rejected() {
        for text in ["", "#fff", "#gggggg", "#12345", "#1234567"] {
            assert!(Background::parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn background_serializes_with_alpha() {
        let text: String = Background::parse("#102030").unwrap().into();
        assert_eq!(text, "#10203000");
    }

    #[test]
    fn anchor_clamps() {
        assert_eq!(Anchor::new(-1.0, 2.0), Anchor { x: 0.0, y: 1.0 });
    }

    #[test]
    fn filter_aliases() {
        assert_eq!(
            "antialias".parse::<ResampleFilter>().unwrap(),
            ResampleFilter::Lanczos3
        );
        assert_eq!(
            "bilinear".parse::<ResampleFilter>().unwrap(),
            ResampleFilter::Triangle
        );
        assert!("box".parse::<ResampleFilter>().is_err());
    }
}
