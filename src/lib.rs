//! # Thumbfall
//!
//! Two small pieces of a content system's media layer:
//!
//! - **Fallback paths**: a field that is empty on a document reads as the
//!   value found by walking a dotted path (`artwork.thumbnails.list`) through
//!   the document's object graph.
//! - **Thumbnail renderers**: crop, resize and letterbox transforms that turn
//!   the bytes of a source image into the encoded bytes of a thumbnail.
//!
//! ```text
//! source bytes → decode → normalize color → crop | resize | letterbox → encode → thumbnail bytes
//! document     → own value? ─ no → walk fallback path → value or not found
//! ```
//!
//! Both are pure and synchronous. Nothing is cached between calls and no
//! state is shared, so callers may run them from any number of threads.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`value`] | Dynamic object graph: scalars, lists, maps, objects, callables |
//! | [`fallback`] | Path parsing, traversal, and fields that read through a fallback path |
//! | [`imaging`] | Render specs, the renderers, decoding and encoding |
//! | [`thumbnails`] | Keyed sets of thumbnails rendered together for one source |
//! | [`naming`] | Deterministic thumbnail filenames |
//! | [`config`] | `thumbfall.toml` loading and validation |
//! | [`sources`] | Source discovery for the CLI: files and walked directories |
//! | [`batch`] | Parallel rendering of many sources to an output directory |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Broken Chains Are Not Errors
//!
//! Walking `a.b.c` stops at the first segment that finds nothing: a missing
//! attribute, a missing key, an index past the end, or a `Null` in the
//! middle. The result is [`fallback::Resolution::NotFound`] and nothing
//! further down the path is evaluated, including callables. Only a malformed
//! path (`a..b`, empty) is an error, and fixed paths are parsed once at
//! declaration time.
//!
//! ## Explicit Codec Settings
//!
//! Resampling filter and decoder limits travel in an
//! [`imaging::CodecConfig`] passed to every render call instead of living in
//! process-wide state. The same inputs always produce the same bytes.
//!
//! ## Renderers Only Transform Pixels
//!
//! Decoding, color normalization and encoding are shared free functions.
//! A renderer implements [`imaging::ImageRenderer::transform`] and nothing
//! else, so the pipeline in [`imaging::generate`] is written once.

pub mod batch;
pub mod config;
pub mod fallback;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod sources;
pub mod thumbnails;
pub mod value;

#[cfg(test)]
pub(crate) mod test_helpers;
