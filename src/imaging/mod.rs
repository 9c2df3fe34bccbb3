//! Thumbnail rendering in pure Rust, built on the `image` crate.
//!
//! | Renderer | Transform |
//! |---|---|
//! | **Crop** | bleed trim + anchored crop + `resize_exact` |
//! | **Resize** | constrained / stretched `resize_exact` |
//! | **Letterbox** | resize + paste onto a background canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for render geometry (unit testable)
//! - **Parameters**: Formats, quality, colors, anchors, filters
//! - **Spec**: [`RenderSpec`], the immutable description of one transform
//! - **Renderer**: [`ImageRenderer`] trait + the concrete renderers
//! - **Codec**: decode / encode and the [`generate`] entry point

mod calculations;
mod codec;
mod error;
mod params;
mod renderer;
mod spec;

pub use calculations::{CropBox, crop_box, letterbox_offset, resize_dimensions};
pub use codec::{CodecConfig, decode, encode, generate, normalize_color, render};
pub use error::RenderError;
pub use params::{Anchor, Background, OutputFormat, ParamError, Quality, ResampleFilter};
pub use renderer::{
    BaseRenderer, CropRenderer, ImageRenderer, LetterboxRenderer, RenderKind, ResizeRenderer,
};
pub use spec::RenderSpec;
