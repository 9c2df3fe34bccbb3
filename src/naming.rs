//! Deterministic thumbnail filenames.
//!
//! A thumbnail lives next to its source and is named after the thumbnail key
//! and the source's file stem:
//!
//! ```text
//! artwork/b3d23ba4.jpg + key "homepage_image" + PNG → artwork/homepage_image.b3d23ba4.png
//! ```
//!
//! The name depends only on its inputs, so it can be computed on every read
//! without touching storage.

use crate::imaging::OutputFormat;
use std::path::Path;

/// Filename of the thumbnail `key` of `original`, encoded as `format`.
///
/// Uses `/` as separator regardless of platform: these are storage names,
/// not local paths.
pub fn thumbnail_filename(original: &str, key: &str, format: OutputFormat) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let filename = format!("{}.{}.{}", key, stem, format.extension());

    match original.rfind('/') {
        Some(pos) => format!("{}/{}", &original[..pos], filename),
        None => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_directory() {
        assert_eq!(
            thumbnail_filename("artwork/b3d23ba4.jpg", "homepage_image", OutputFormat::Jpeg),
            "artwork/homepage_image.b3d23ba4.jpg"
        );
    }

    #[test]
    fn extension_follows_output_format() {
        assert_eq!(
            thumbnail_filename("artwork/b3d23ba4.jpg", "list", OutputFormat::Png),
            "artwork/list.b3d23ba4.png"
        );
    }

    #[test]
    fn bare_filename() {
        assert_eq!(
            thumbnail_filename("photo.tiff", "small", OutputFormat::Jpeg),
            "small.photo.jpg"
        );
    }

    #[test]
    fn nested_directories_and_dotted_stems() {
        assert_eq!(
            thumbnail_filename("media/2024/05/sunset.final.png", "wide", OutputFormat::WebP),
            "media/2024/05/wide.sunset.final.webp"
        );
    }

    #[test]
    fn no_extension() {
        assert_eq!(
            thumbnail_filename("uploads/raw", "thumb", OutputFormat::Gif),
            "uploads/thumb.raw.gif"
        );
    }

    #[test]
    fn same_inputs_same_name() {
        let a = thumbnail_filename("a/b.jpg", "k", OutputFormat::Jpeg);
        let b = thumbnail_filename("a/b.jpg", "k", OutputFormat::Jpeg);
        assert_eq!(a, b);
    }
}
