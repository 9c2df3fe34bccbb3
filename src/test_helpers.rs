//! Shared test utilities for the thumbfall test suite.
//!
//! Synthetic images for the render tests and small object graphs for the
//! fallback tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = encoded(&gradient(200, 100), ImageFormat::Png);
//! let artwork = artwork_graph();
//! ```

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::value::{Record, Value};

// =========================================================================
// Images
// =========================================================================

/// An RGB image whose pixels vary along both axes.
///
/// Varying content keeps crops and resamples distinguishable in assertions.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        image::Rgb([r, g, 128])
    });
    DynamicImage::ImageRgb8(img)
}

/// Encode `image` in `format` entirely in memory.
pub fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Write a gradient to `dir/name`, encoded according to the extension.
pub fn write_gradient(dir: &Path, name: &str, width: u32, height: u32) {
    gradient(width, height).save(dir.join(name)).unwrap();
}

// =========================================================================
// Object graphs
// =========================================================================

/// `artwork.artist.name` and `artwork.images[0].caption`, the shapes most
/// fallback tests walk.
pub fn artwork_graph() -> Value {
    let artist = Record::new("Artist")
        .with("name", "Hilma af Klint")
        .with("bio", Value::Null);
    let image = Record::new("Image").with("caption", "The Ten Largest, No. 7");
    Record::new("Artwork")
        .with("title", "Adulthood")
        .with("artist", artist.into_value())
        .with("images", Value::list([image.into_value()]))
        .into_value()
}
