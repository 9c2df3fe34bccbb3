//! Decode, normalize, encode: the plumbing shared by every renderer.
//!
//! | Step | Function |
//! |---|---|
//! | Check spec | [`RenderSpec::validate`] (before any decode) |
//! | Decode with limits | [`decode`] |
//! | Color mode | [`normalize_color`] |
//! | Transform | [`ImageRenderer::transform`] |
//! | Encode | [`encode`] |
//!
//! [`generate`] runs all of them. The decoded buffer lives only inside one
//! call; nothing is cached between calls, so concurrent calls need no
//! coordination.

use super::error::RenderError;
use super::params::{OutputFormat, Quality, ResampleFilter};
use super::renderer::ImageRenderer;
use super::spec::RenderSpec;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageReader, Limits};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Explicit codec settings passed to every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Resampling filter used by every renderer.
    pub filter: ResampleFilter,
    /// Largest accepted source width, in pixels.
    pub max_width: u32,
    /// Largest accepted source height, in pixels.
    pub max_height: u32,
    /// Largest decoder allocation, in bytes.
    pub max_alloc: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::Lanczos3,
            max_width: 16_384,
            max_height: 16_384,
            max_alloc: 512 * 1024 * 1024,
        }
    }
}

impl CodecConfig {
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

/// Decode image bytes, guessing the format from their content.
pub fn decode(content: &[u8], codec: &CodecConfig) -> Result<DynamicImage, RenderError> {
    let mut reader = ImageReader::new(Cursor::new(content)).with_guessed_format()?;
    reader.limits(codec.limits());
    reader.decode().map_err(RenderError::UnreadableImage)
}

/// Force a standard color mode: 8-bit grayscale, RGB and RGBA pass through,
/// everything else becomes 8-bit RGB.
pub fn normalize_color(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 | ColorType::Rgba8 => image,
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

/// Convert to a pixel layout the target codec can write.
fn prepare_for_encoding(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    let color = image.color();
    match format {
        OutputFormat::Jpeg => match color {
            ColorType::L8 | ColorType::Rgb8 => image,
            // JPEG has no alpha channel: flatten by dropping it
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
        OutputFormat::Png | OutputFormat::Tiff | OutputFormat::Bmp => match color {
            ColorType::L8 | ColorType::Rgb8 | ColorType::Rgba8 => image,
            _ if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
        OutputFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        OutputFormat::WebP | OutputFormat::Avif => match color {
            ColorType::Rgb8 | ColorType::Rgba8 => image,
            _ if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
    }
}

/// Encode an image to bytes.
///
/// Quality applies to JPEG and AVIF. AVIF uses encoder speed 6, a reasonable
/// trade between throughput and size.
pub fn encode(
    image: DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, RenderError> {
    let image = prepare_for_encoding(image, format);
    let mut buffer = Cursor::new(Vec::new());
    let quality = quality.value() as u8;

    let written = match format {
        OutputFormat::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
        }
        OutputFormat::Avif => {
            image.write_with_encoder(AvifEncoder::new_with_speed_quality(&mut buffer, 6, quality))
        }
        other => image.write_to(&mut buffer, other.image_format()),
    };
    written.map_err(|source| RenderError::Encode {
        format: format.name(),
        source,
    })?;

    Ok(buffer.into_inner())
}

/// Apply a renderer to an already decoded image.
pub fn render(
    image: DynamicImage,
    renderer: &dyn ImageRenderer,
    spec: &RenderSpec,
    codec: &CodecConfig,
) -> Result<DynamicImage, RenderError> {
    spec.validate()?;
    let image = if spec.force_rgb() {
        normalize_color(image)
    } else {
        image
    };
    renderer.transform(image, spec, codec.filter)
}

/// Decode `content`, transform it, and encode the result.
///
/// The spec is validated before decoding, so a bad spec never costs a decode.
pub fn generate(
    content: &[u8],
    renderer: &dyn ImageRenderer,
    spec: &RenderSpec,
    codec: &CodecConfig,
) -> Result<Vec<u8>, RenderError> {
    spec.validate()?;
    let image = decode(content, codec)?;
    let source = (image.width(), image.height());

    let rendered = render(image, renderer, spec, codec)?;
    tracing::debug!(
        renderer = renderer.name(),
        source_width = source.0,
        source_height = source.1,
        width = rendered.width(),
        height = rendered.height(),
        format = spec.format().name(),
        "rendered image"
    );

    encode(rendered, spec.format(), spec.quality())
}
