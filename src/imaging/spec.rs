//! The immutable description of one transform.

use super::error::RenderError;
use super::params::{Anchor, Background, OutputFormat, Quality};

/// Everything a renderer needs to know about one thumbnail.
///
/// Built with [`RenderSpec::new`] and refined with the `with_*` methods, each
/// of which returns a new value. Dimensions and bleed are checked on
/// construction (the anchor when it is set); [`RenderSpec::validate`] repeats the checks so specs from
/// any source are rejected before a single byte is decoded.
///
/// | Field | Default | Used by |
/// |---|---|---|
/// | `format` | JPEG | all |
/// | `quality` | 100 | all (lossy formats) |
/// | `force_rgb` | `true` | all |
/// | `constrain` | `true` | resize, letterbox |
/// | `upscale` | `false` | resize, letterbox |
/// | `background` | opaque white | letterbox |
/// | `bleed` | `0.0` | crop |
/// | `anchor` | centre | crop |
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: Quality,
    force_rgb: bool,
    constrain: bool,
    upscale: bool,
    background: Option<Background>,
    bleed: f64,
    anchor: Anchor,
}

impl RenderSpec {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let spec = Self {
            width,
            height,
            format: OutputFormat::default(),
            quality: Quality::default(),
            force_rgb: true,
            constrain: true,
            upscale: false,
            background: None,
            bleed: 0.0,
            anchor: Anchor::CENTER,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSpec(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..0.5).contains(&self.bleed) {
            return Err(RenderError::InvalidSpec(format!(
                "bleed must be in [0, 0.5), got {}",
                self.bleed
            )));
        }
        if !self.anchor.in_range() {
            return Err(RenderError::InvalidSpec(format!(
                "anchor must be within 0.0-1.0 on both axes, got ({}, {})",
                self.anchor.x, self.anchor.y
            )));
        }
        Ok(())
    }

    pub fn with_format(self, format: OutputFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_quality(self, quality: Quality) -> Self {
        Self { quality, ..self }
    }

    pub fn with_force_rgb(self, force_rgb: bool) -> Self {
        Self { force_rgb, ..self }
    }

    pub fn with_constrain(self, constrain: bool) -> Self {
        Self { constrain, ..self }
    }

    pub fn with_upscale(self, upscale: bool) -> Self {
        Self { upscale, ..self }
    }

    pub fn with_background(self, background: Background) -> Self {
        Self {
            background: Some(background),
            ..self
        }
    }

    pub fn with_bleed(self, bleed: f64) -> Result<Self, RenderError> {
        let spec = Self { bleed, ..self };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_anchor(self, anchor: Anchor) -> Result<Self, RenderError> {
        let spec = Self { anchor, ..self };
        spec.validate()?;
        Ok(spec)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn force_rgb(&self) -> bool {
        self.force_rgb
    }

    pub fn constrain(&self) -> bool {
        self.constrain
    }

    pub fn upscale(&self) -> bool {
        self.upscale
    }

    /// The declared background, or opaque white.
    pub fn background(&self) -> Background {
        self.background.unwrap_or_default()
    }

    pub fn bleed(&self) -> f64 {
        self.bleed
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}
