//! End-to-end properties of the renderers through the public `generate` API.
//!
//! Every test starts from encoded bytes and decodes the output again, the
//! way the storage layer and the backfill use the crate.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use thumbfall::imaging::{
    Anchor, Background, BaseRenderer, CodecConfig, CropRenderer, ImageRenderer, LetterboxRenderer,
    OutputFormat, RenderError, RenderKind, RenderSpec, ResizeRenderer, decode, generate,
};

fn checkerboard(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            image::Rgb([20, 20, 20])
        } else {
            image::Rgb([230, 230, 230])
        }
    }))
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn render(
    source: &[u8],
    renderer: &dyn ImageRenderer,
    spec: &RenderSpec,
) -> DynamicImage {
    let codec = CodecConfig::default();
    let bytes = generate(source, renderer, spec, &codec).unwrap();
    decode(&bytes, &codec).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    encode(&checkerboard(width, height), ImageFormat::Png)
}

#[test]
fn crop_square_to_half_size() {
    let out = render(&png(100, 100), &CropRenderer, &RenderSpec::new(50, 50).unwrap());
    assert_eq!(out.dimensions(), (50, 50));
}

#[test]
fn crop_matches_target_for_mismatched_aspects() {
    for (w, h) in [(300, 100), (100, 300), (123, 77)] {
        let out = render(&png(w, h), &CropRenderer, &RenderSpec::new(64, 48).unwrap());
        assert_eq!(out.dimensions(), (64, 48), "source {w}x{h}");
    }
}

#[test]
fn crop_with_bleed_and_anchor() {
    let spec = RenderSpec::new(30, 30)
        .unwrap()
        .with_bleed(0.1)
        .unwrap()
        .with_anchor(Anchor::new(0.0, 0.0))
        .unwrap();
    let out = render(&png(200, 100), &CropRenderer, &spec);
    assert_eq!(out.dimensions(), (30, 30));
}

#[test]
fn out_of_range_anchor_is_rejected() {
    let spec = RenderSpec::new(50, 50).unwrap();
    assert!(spec.with_anchor(Anchor { x: 3.0, y: 0.5 }).is_err());
}

#[test]
fn resize_never_upscales_by_default() {
    let out = render(&png(100, 100), &ResizeRenderer, &RenderSpec::new(500, 500).unwrap());
    assert_eq!(out.dimensions(), (100, 100));
}

#[test]
fn resize_upscales_on_request() {
    let spec = RenderSpec::new(500, 500).unwrap().with_upscale(true);
    let out = render(&png(100, 100), &ResizeRenderer, &spec);
    assert_eq!(out.dimensions(), (500, 500));
}

#[test]
fn resize_keeps_aspect_ratio() {
    let out = render(&png(400, 100), &ResizeRenderer, &RenderSpec::new(200, 200).unwrap());
    assert_eq!(out.dimensions(), (200, 50));
}

#[test]
fn letterbox_is_always_exact_size() {
    for (w, h) in [(10, 10), (400, 100), (100, 400), (1000, 1000)] {
        let spec = RenderSpec::new(120, 80)
            .unwrap()
            .with_format(OutputFormat::Png);
        let out = render(&png(w, h), &LetterboxRenderer, &spec);
        assert_eq!(out.dimensions(), (120, 80), "source {w}x{h}");
    }
}

#[test]
fn letterbox_padding_uses_background() {
    let bg = Background::parse("#ff000080").unwrap();
    let spec = RenderSpec::new(100, 100)
        .unwrap()
        .with_format(OutputFormat::Png)
        .with_background(bg);
    let out = render(&png(100, 50), &LetterboxRenderer, &spec);

    assert_eq!(out.get_pixel(50, 0), Rgba([255, 0, 0, 128]));
    assert_eq!(out.get_pixel(50, 99), Rgba([255, 0, 0, 128]));
    assert_eq!(out.get_pixel(50, 50)[3], 255);
}

#[test]
fn letterbox_rgb_background_is_transparent_in_png() {
    let spec = RenderSpec::new(40, 40)
        .unwrap()
        .with_format(OutputFormat::Png)
        .with_background(Background::parse("#336699").unwrap());
    let out = render(&png(40, 20), &LetterboxRenderer, &spec);
    assert_eq!(out.get_pixel(0, 0), Rgba([0x33, 0x66, 0x99, 0]));
}

#[test]
fn output_format_is_honoured() {
    let source = png(64, 64);
    let codec = CodecConfig::default();
    for (format, expected) in [
        (OutputFormat::Jpeg, ImageFormat::Jpeg),
        (OutputFormat::Png, ImageFormat::Png),
        (OutputFormat::Gif, ImageFormat::Gif),
        (OutputFormat::Bmp, ImageFormat::Bmp),
        (OutputFormat::Tiff, ImageFormat::Tiff),
        (OutputFormat::WebP, ImageFormat::WebP),
    ] {
        let spec = RenderSpec::new(32, 32).unwrap().with_format(format);
        let bytes = generate(&source, &CropRenderer, &spec, &codec).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), expected, "{format:?}");
    }
}

#[test]
fn jpeg_output_from_transparent_source() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([10, 200, 30, 0])));
    let source = encode(&rgba, ImageFormat::Png);
    let spec = RenderSpec::new(20, 20).unwrap();
    let out = render(&source, &LetterboxRenderer, &spec);
    assert_eq!(out.dimensions(), (20, 20));
    assert!(!out.color().has_alpha());
}

#[test]
fn jpeg_sources_round_trip() {
    let source = encode(&checkerboard(80, 60), ImageFormat::Jpeg);
    for kind in [RenderKind::Crop, RenderKind::Resize, RenderKind::Letterbox] {
        let out = render(&source, kind.renderer(), &RenderSpec::new(40, 40).unwrap());
        let expected = match kind {
            RenderKind::Resize => (40, 30),
            _ => (40, 40),
        };
        assert_eq!(out.dimensions(), expected, "{kind}");
    }
}

#[test]
fn base_renderer_fails_not_implemented() {
    let result = generate(
        &png(10, 10),
        &BaseRenderer,
        &RenderSpec::new(5, 5).unwrap(),
        &CodecConfig::default(),
    );
    assert!(matches!(result, Err(RenderError::NotImplemented(_))));
}

#[test]
fn garbage_input_is_unreadable() {
    let result = generate(
        b"definitely not an image",
        &CropRenderer,
        &RenderSpec::new(5, 5).unwrap(),
        &CodecConfig::default(),
    );
    assert!(matches!(result, Err(RenderError::UnreadableImage(_))));
}

#[test]
fn oversized_source_is_rejected_by_limits() {
    let codec = CodecConfig {
        max_width: 50,
        max_height: 50,
        ..CodecConfig::default()
    };
    let result = generate(
        &png(100, 20),
        &CropRenderer,
        &RenderSpec::new(5, 5).unwrap(),
        &codec,
    );
    assert!(matches!(result, Err(RenderError::UnreadableImage(_))));
}

#[test]
fn output_is_deterministic() {
    let source = png(97, 61);
    let spec = RenderSpec::new(33, 21).unwrap();
    let codec = CodecConfig::default();
    let a = generate(&source, &CropRenderer, &spec, &codec).unwrap();
    let b = generate(&source, &CropRenderer, &spec, &codec).unwrap();
    assert_eq!(a, b);
}
