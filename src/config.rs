//! Configuration module.
//!
//! Loads and validates a `thumbfall.toml` file declaring the thumbnails to
//! render, the fallback fields to read, and codec and processing settings.
//! Every section is optional; a missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! [codec]
//! filter = "lanczos3"       # nearest, triangle, catmullrom, gaussian, lanczos3
//! max_width = 16384         # Largest accepted source width
//! max_height = 16384        # Largest accepted source height
//! max_alloc = 536870912     # Largest decoder allocation in bytes
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [[thumbnails]]
//! key = "list"              # Unique; part of the thumbnail filename
//! renderer = "crop"         # crop, resize, letterbox
//! width = 200
//! height = 200
//! format = "jpeg"           # jpeg/jpg, png, gif, bmp, tiff, webp, avif
//! quality = 100             # 1-100, lossy formats only
//! force_rgb = true
//! constrain = true          # resize/letterbox: keep the source aspect ratio
//! upscale = false           # resize/letterbox: allow growing the source
//! bg_color = "#ffffff"      # letterbox: #RRGGBB or #RRGGBBAA
//! bleed = 0.0               # crop: fraction trimmed from every edge, < 0.5
//! anchor = { x = 0.5, y = 0.5 }
//!
//! [[fallbacks]]
//! field = "cover"
//! path = "thumbnails.list"
//! ```
//!
//! A `[[thumbnails]]` list in the file replaces the stock list entirely.
//! Unknown keys are rejected to catch typos early.

use crate::fallback::{FallbackField, FallbackPath};
use crate::imaging::{
    Anchor, Background, CodecConfig, OutputFormat, Quality, RenderError, RenderKind, RenderSpec,
};
use crate::thumbnails::{ThumbnailDef, ThumbnailError, ThumbnailSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Thumbnail {key}: {source}")]
    Render {
        key: String,
        #[source]
        source: RenderError,
    },
    #[error(transparent)]
    Thumbnails(#[from] ThumbnailError),
}

/// Configuration loaded from `thumbfall.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbfallConfig {
    /// Decoder limits and resampling filter.
    pub codec: CodecConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Declared thumbnails, in render order.
    pub thumbnails: Vec<ThumbnailConfig>,
    /// Fields that fall back along a path when empty.
    pub fallbacks: Vec<FallbackConfig>,
}

impl Default for ThumbfallConfig {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            processing: ProcessingConfig::default(),
            thumbnails: vec![
                ThumbnailConfig::new("list", RenderKind::Crop, 200, 200),
                ThumbnailConfig::new("detail", RenderKind::Resize, 1200, 1200),
            ],
            fallbacks: Vec::new(),
        }
    }
}

impl ThumbfallConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.codec.max_width == 0 || self.codec.max_height == 0 {
            return Err(ConfigError::Validation(
                "codec.max_width and codec.max_height must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        for thumb in &self.thumbnails {
            thumb.validate()?;
        }
        let mut fields = HashSet::new();
        for fallback in &self.fallbacks {
            if fallback.field.is_empty() {
                return Err(ConfigError::Validation(
                    "fallbacks.field must not be empty".into(),
                ));
            }
            if !fields.insert(fallback.field.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate fallback field: {}",
                    fallback.field
                )));
            }
        }
        self.thumbnail_set()?;
        Ok(())
    }

    /// Build the declared thumbnails.
    pub fn thumbnail_set(&self) -> Result<ThumbnailSet, ConfigError> {
        let defs = self
            .thumbnails
            .iter()
            .map(ThumbnailConfig::to_def)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ThumbnailSet::new(defs)?)
    }

    pub fn fallback_fields(&self) -> Vec<FallbackField> {
        self.fallbacks
            .iter()
            .map(|f| FallbackField::with_path(f.field.clone(), f.path.clone()))
            .collect()
    }

    pub fn fallback_field(&self, name: &str) -> Option<FallbackField> {
        self.fallbacks
            .iter()
            .find(|f| f.field == name)
            .map(|f| FallbackField::with_path(f.field.clone(), f.path.clone()))
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

fn default_true() -> bool {
    true
}

/// One `[[thumbnails]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThumbnailConfig {
    pub key: String,
    pub renderer: RenderKind,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default = "default_true")]
    pub force_rgb: bool,
    #[serde(default = "default_true")]
    pub constrain: bool,
    #[serde(default)]
    pub upscale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<Background>,
    #[serde(default)]
    pub bleed: f64,
    #[serde(default)]
    pub anchor: Anchor,
}

impl ThumbnailConfig {
    pub fn new(key: impl Into<String>, renderer: RenderKind, width: u32, height: u32) -> Self {
        Self {
            key: key.into(),
            renderer,
            width,
            height,
            format: OutputFormat::default(),
            quality: Quality::default(),
            force_rgb: true,
            constrain: true,
            upscale: false,
            bg_color: None,
            bleed: 0.0,
            anchor: Anchor::CENTER,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.key must not be empty".into(),
            ));
        }
        if self.key.contains(['/', '.']) {
            return Err(ConfigError::Validation(format!(
                "thumbnails.key {:?} must not contain '/' or '.'",
                self.key
            )));
        }
        if !self.anchor.in_range() {
            return Err(ConfigError::Validation(format!(
                "thumbnails.anchor of {} must be within 0.0-1.0",
                self.key
            )));
        }
        Ok(())
    }

    /// The render spec this entry describes.
    pub fn to_def(&self) -> Result<ThumbnailDef, ConfigError> {
        let render_err = |source| ConfigError::Render {
            key: self.key.clone(),
            source,
        };
        let mut spec = RenderSpec::new(self.width, self.height)
            .map_err(render_err)?
            .with_format(self.format)
            .with_quality(self.quality)
            .with_force_rgb(self.force_rgb)
            .with_constrain(self.constrain)
            .with_upscale(self.upscale)
            .with_anchor(self.anchor)
            .and_then(|spec| spec.with_bleed(self.bleed))
            .map_err(render_err)?;
        if let Some(bg) = self.bg_color {
            spec = spec.with_background(bg);
        }
        Ok(ThumbnailDef::new(self.key.clone(), self.renderer, spec))
    }
}

/// One `[[fallbacks]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    pub field: String,
    pub path: FallbackPath,
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<ThumbfallConfig, ConfigError> {
    let config: ThumbfallConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults. Unknown keys are rejected and
/// the result is validated.
pub fn load_config(path: &Path) -> Result<ThumbfallConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ThumbfallConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `thumbfall.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbfall Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Codec
# ---------------------------------------------------------------------------
[codec]
# Resampling filter used by every renderer:
# nearest, triangle, catmullrom, gaussian, lanczos3.
filter = "lanczos3"

# Sources larger than this (in pixels) are rejected as unreadable.
max_width = 16384
max_height = 16384

# Largest decoder allocation, in bytes (512 MiB).
max_alloc = 536870912

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
# Each entry renders one thumbnail per source image, stored next to the
# source as <dir>/<key>.<source stem>.<format extension>.
#
# renderer:
#   crop      - fill width x height exactly, cropping the overflow
#   resize    - fit within width x height
#   letterbox - fit, then pad to exactly width x height with bg_color
#
# Optional keys and their defaults:
#   format = "jpeg"       # jpeg/jpg, png, gif, bmp, tiff, webp, avif
#   quality = 100         # 1-100, lossy formats only
#   force_rgb = true      # convert exotic color modes to RGB after decoding
#   constrain = true      # resize/letterbox: keep the source aspect ratio
#   upscale = false       # resize/letterbox: allow growing past the source
#   bg_color = "#ffffff"  # letterbox: #RRGGBB (transparent) or #RRGGBBAA
#   bleed = 0.0           # crop: fraction trimmed from every edge, < 0.5
#   anchor = { x = 0.5, y = 0.5 }  # crop: placement, 0.0-1.0 per axis

[[thumbnails]]
key = "list"
renderer = "crop"
width = 200
height = 200

[[thumbnails]]
key = "detail"
renderer = "resize"
width = 1200
height = 1200

# ---------------------------------------------------------------------------
# Fallback fields
# ---------------------------------------------------------------------------
# A field that is empty on a document reads as the value found by walking a
# dotted path from the document root. Numeric segments index lists.
#
# [[fallbacks]]
# field = "cover"
# path = "gallery.images.0.thumbnails.list"
"##
}
