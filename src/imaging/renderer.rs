//! Renderer trait and the crop / resize / letterbox implementations.
//!
//! A renderer only transforms pixels. Decoding, color normalization and
//! encoding are shared free functions in [`codec`](super::codec), so a new
//! renderer implements [`ImageRenderer::transform`] and nothing else.
//!
//! | Renderer | Output size | Aspect ratio |
//! |---|---|---|
//! | [`CropRenderer`] | exactly the target size | target's, by cropping |
//! | [`ResizeRenderer`] | at most the target size (exact with upscale + matching aspect) | source's when constrained |
//! | [`LetterboxRenderer`] | exactly the target size | source's, padded with background |
//! | [`BaseRenderer`] | none | always fails with `NotImplemented` |

use super::calculations::{crop_box, letterbox_offset, resize_dimensions};
use super::error::RenderError;
use super::params::ResampleFilter;
use super::spec::RenderSpec;
use image::{DynamicImage, RgbaImage, imageops};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pixel transform driven by a [`RenderSpec`].
///
/// Implementations must be deterministic: the same image, spec and filter
/// always produce the same pixels.
pub trait ImageRenderer: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    fn transform(
        &self,
        image: DynamicImage,
        spec: &RenderSpec,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, RenderError>;
}

/// Shares the decode/encode plumbing but renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseRenderer;

impl ImageRenderer for BaseRenderer {
    fn name(&self) -> &'static str {
        "base"
    }

    fn transform(
        &self,
        _image: DynamicImage,
        _spec: &RenderSpec,
        _filter: ResampleFilter,
    ) -> Result<DynamicImage, RenderError> {
        Err(RenderError::NotImplemented(self.name()))
    }
}

/// Fills the target size exactly: crop to the target aspect ratio around the
/// anchor (after trimming bleed), then resample.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropRenderer;

impl ImageRenderer for CropRenderer {
    fn name(&self) -> &'static str {
        "crop"
    }

    fn transform(
        &self,
        image: DynamicImage,
        spec: &RenderSpec,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, RenderError> {
        let (width, height) = spec.size();
        let region = crop_box(
            (image.width(), image.height()),
            (width, height),
            spec.bleed(),
            spec.anchor(),
        );
        let cropped = image.crop_imm(region.x, region.y, region.width, region.height);
        Ok(cropped.resize_exact(width, height, filter.filter_type()))
    }
}

/// Scales to fit the target size, honoring the constrain and upscale flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeRenderer;

impl ImageRenderer for ResizeRenderer {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn transform(
        &self,
        image: DynamicImage,
        spec: &RenderSpec,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, RenderError> {
        let source = (image.width(), image.height());
        let (width, height) = resize_dimensions(source, spec.size(), spec.constrain(), spec.upscale());
        if (width, height) == source {
            return Ok(image);
        }
        Ok(image.resize_exact(width, height, filter.filter_type()))
    }
}

/// Resizes like [`ResizeRenderer`], then centres the result on a canvas of
/// exactly the target size painted with the configured background.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterboxRenderer;

impl ImageRenderer for LetterboxRenderer {
    fn name(&self) -> &'static str {
        "letterbox"
    }

    fn transform(
        &self,
        image: DynamicImage,
        spec: &RenderSpec,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, RenderError> {
        let fitted = ResizeRenderer.transform(image, spec, filter)?.to_rgba8();
        let (width, height) = spec.size();
        let (x, y) = letterbox_offset((width, height), fitted.dimensions());

        let mut canvas = RgbaImage::from_pixel(width, height, spec.background().rgba());
        // Paste, not blend: the fitted pixels replace the canvas pixels.
        imageops::replace(&mut canvas, &fitted, i64::from(x), i64::from(y));
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

/// The concrete renderers, selectable by name in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Crop,
    Resize,
    Letterbox,
}

impl RenderKind {
    pub fn renderer(self) -> &'static dyn ImageRenderer {
        match self {
            RenderKind::Crop => &CropRenderer,
            RenderKind::Resize => &ResizeRenderer,
            RenderKind::Letterbox => &LetterboxRenderer,
        }
    }
}

impl FromStr for RenderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crop" => Ok(RenderKind::Crop),
            "resize" => Ok(RenderKind::Resize),
            "letterbox" => Ok(RenderKind::Letterbox),
            _ => Err(format!("unknown renderer: {s:?}")),
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.renderer().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Background;
    use crate::test_helpers::gradient;
    use image::{GenericImageView, Rgba};

    const FILTER: ResampleFilter = ResampleFilter::Lanczos3;

    fn spec(w: u32, h: u32) -> RenderSpec {
        RenderSpec::new(w, h).unwrap()
    }

    #[test]
    fn base_renderer_is_not_implemented() {
        let result = BaseRenderer.transform(gradient(10, 10), &spec(5, 5), FILTER);
        assert!(matches!(result, Err(RenderError::NotImplemented("base"))));
    }

    #[test]
    fn crop_yields_exact_size_for_any_aspect() {
        for (sw, sh) in [(100, 100), (300, 100), (100, 300), (1, 1), (7, 3)] {
            for (w, h) in [(50, 50), (160, 90), (9, 16), (1, 1)] {
                let out = CropRenderer
                    .transform(gradient(sw, sh), &spec(w, h), FILTER)
                    .unwrap();
                assert_eq!(out.dimensions(), (w, h), "{sw}x{sh} -> {w}x{h}");
            }
        }
    }

    #[test]
    fn crop_with_bleed_keeps_size() {
        let spec = spec(40, 30).with_bleed(0.2).unwrap();
        let out = CropRenderer.transform(gradient(200, 120), &spec, FILTER).unwrap();
        assert_eq!(out.dimensions(), (40, 30));
    }

    #[test]
    fn resize_does_not_upscale_by_default() {
        let out = ResizeRenderer
            .transform(gradient(100, 100), &spec(500, 500), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn resize_upscales_when_allowed() {
        let out = ResizeRenderer
            .transform(gradient(100, 100), &spec(500, 500).with_upscale(true), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (500, 500));
    }

    #[test]
    fn resize_constrained_keeps_aspect() {
        let out = ResizeRenderer
            .transform(gradient(400, 300), &spec(200, 200), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (200, 150));
    }

    #[test]
    fn resize_unconstrained_stretches() {
        let out = ResizeRenderer
            .transform(gradient(400, 300), &spec(200, 250).with_constrain(false), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (200, 250));
    }

    #[test]
    fn letterbox_fills_canvas_and_pads_with_background() {
        let bg = Background::parse("#00ff00").unwrap();
        let out = LetterboxRenderer
            .transform(gradient(400, 200), &spec(200, 200).with_background(bg), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (200, 200));

        // Content is 200x100 at y = 50; rows above and below are padding
        assert_eq!(out.get_pixel(0, 0), bg.rgba());
        assert_eq!(out.get_pixel(199, 199), bg.rgba());
        assert_eq!(out.get_pixel(100, 49), bg.rgba());
        assert_eq!(out.get_pixel(100, 100)[3], 255);
    }

    #[test]
    fn letterbox_default_background_is_opaque_white() {
        let out = LetterboxRenderer
            .transform(gradient(10, 20), &spec(40, 40), FILTER)
            .unwrap();
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn letterbox_small_source_is_centred_unscaled() {
        let out = LetterboxRenderer
            .transform(gradient(11, 10), &spec(40, 40), FILTER)
            .unwrap();
        // (40 - 11) / 2 = 14, (40 - 10) / 2 = 15
        assert_eq!(out.get_pixel(13, 20), Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(14, 15)[3], 255);
        assert_eq!(out.get_pixel(24, 24)[3], 255);
        assert_eq!(out.get_pixel(25, 20), Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(20, 14), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn kinds_map_to_renderers() {
        assert_eq!(RenderKind::Crop.renderer().name(), "crop");
        assert_eq!("Letterbox".parse::<RenderKind>(), Ok(RenderKind::Letterbox));
        assert!("sepia".parse::<RenderKind>().is_err());
        assert_eq!(RenderKind::Resize.to_string(), "resize");
    }
}
