//! The declared thumbnails of one image field.
//!
//! A [`ThumbnailSet`] is an ordered list of [`ThumbnailDef`]s, each a unique
//! key plus a renderer and spec. When a new source image is stored, the set
//! renders every thumbnail (or a selected subset, for backfills) and hands
//! back encoded bytes with the filename each should be saved under.
//!
//! [`ThumbnailSet::accessor`] exposes the thumbnails of one stored image as
//! an [`Object`], so fallback paths such as `artwork.thumbnails.list` can
//! walk into them.

use crate::imaging::{CodecConfig, RenderError, RenderKind, RenderSpec, decode, encode, render};
use crate::naming::thumbnail_filename;
use crate::value::{Object, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("duplicate thumbnail key: {0}")]
    DuplicateKey(String),
    #[error("no thumbnails for keys {0:?}")]
    UnknownKeys(Vec<String>),
    #[error("rendering thumbnail {key} failed: {source}")]
    Render {
        key: String,
        #[source]
        source: RenderError,
    },
}

/// One declared thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailDef {
    pub key: String,
    pub kind: RenderKind,
    pub spec: RenderSpec,
}

impl ThumbnailDef {
    pub fn new(key: impl Into<String>, kind: RenderKind, spec: RenderSpec) -> Self {
        Self {
            key: key.into(),
            kind,
            spec,
        }
    }

    /// Storage name of this thumbnail for the source named `original`.
    pub fn filename(&self, original: &str) -> String {
        thumbnail_filename(original, &self.key, self.spec.format())
    }
}

/// An encoded thumbnail, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedThumbnail {
    pub key: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailSet {
    defs: Vec<ThumbnailDef>,
}

impl ThumbnailSet {
    pub fn new(defs: Vec<ThumbnailDef>) -> Result<Self, ThumbnailError> {
        let mut seen = HashSet::new();
        for def in &defs {
            if !seen.insert(def.key.as_str()) {
                return Err(ThumbnailError::DuplicateKey(def.key.clone()));
            }
        }
        Ok(Self { defs })
    }

    pub fn defs(&self) -> &[ThumbnailDef] {
        &self.defs
    }

    pub fn get(&self, key: &str) -> Option<&ThumbnailDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Thumbnails named by `keys`, in declaration order. Every key must exist.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<&ThumbnailDef>, ThumbnailError> {
        let unknown: Vec<String> = keys
            .iter()
            .map(AsRef::as_ref)
            .filter(|k| self.get(k).is_none())
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(ThumbnailError::UnknownKeys(unknown));
        }
        Ok(self
            .defs
            .iter()
            .filter(|d| keys.iter().any(|k| k.as_ref() == d.key))
            .collect())
    }

    /// `(key, filename)` for every thumbnail of `original`.
    pub fn filenames(&self, original: &str) -> Vec<(&str, String)> {
        self.defs
            .iter()
            .map(|d| (d.key.as_str(), d.filename(original)))
            .collect()
    }

    /// Render all thumbnails of one source.
    pub fn render_all(
        &self,
        original: &str,
        content: &[u8],
        codec: &CodecConfig,
    ) -> Result<Vec<RenderedThumbnail>, ThumbnailError> {
        render_defs(self.defs.iter().collect(), original, content, codec)
    }

    /// Render only the thumbnails named by `keys`.
    pub fn render_selected<S: AsRef<str>>(
        &self,
        keys: &[S],
        original: &str,
        content: &[u8],
        codec: &CodecConfig,
    ) -> Result<Vec<RenderedThumbnail>, ThumbnailError> {
        let selected = self.select(keys)?;
        render_defs(selected, original, content, codec)
    }

    /// The thumbnails of the stored image `original`, addressable by key.
    pub fn accessor(&self, original: &str) -> Value {
        Value::object(ThumbnailAccessor {
            original: original.to_string(),
            set: self.clone(),
        })
    }
}

/// Attribute view of a [`ThumbnailSet`] for one stored image.
///
/// Each declared key reads as its thumbnail filename; undeclared keys are
/// missing. An image with no name yet has no thumbnails at all. Items are
/// the filenames in declaration order.
#[derive(Debug, Clone)]
pub struct ThumbnailAccessor {
    original: String,
    set: ThumbnailSet,
}

impl ThumbnailAccessor {
    fn filename(&self, def: &ThumbnailDef) -> Option<Value> {
        if self.original.is_empty() {
            return None;
        }
        Some(Value::from(def.filename(&self.original)))
    }
}

impl Object for ThumbnailAccessor {
    fn type_name(&self) -> &str {
        "ThumbnailSet"
    }

    fn attr(&self, name: &str) -> Option<Value> {
        self.filename(self.set.get(name)?)
    }

    fn item(&self, index: usize) -> Option<Value> {
        self.filename(self.set.defs.get(index)?)
    }
}

/// Decode `content` once, then render and encode each def from that buffer.
///
/// Every spec is validated before decoding. A source that cannot be decoded
/// is reported against the first thumbnail.
fn render_defs(
    defs: Vec<&ThumbnailDef>,
    original: &str,
    content: &[u8],
    codec: &CodecConfig,
) -> Result<Vec<RenderedThumbnail>, ThumbnailError> {
    let Some(&first) = defs.first() else {
        return Ok(Vec::new());
    };
    let failed = |def: &ThumbnailDef| {
        let key = def.key.clone();
        move |source| ThumbnailError::Render { key, source }
    };

    for &def in &defs {
        def.spec.validate().map_err(failed(def))?;
    }
    let image = decode(content, codec).map_err(failed(first))?;

    defs.into_iter()
        .map(|def| {
            let rendered = render(image.clone(), def.kind.renderer(), &def.spec, codec)
                .map_err(failed(def))?;
            tracing::debug!(
                original,
                key = %def.key,
                width = rendered.width(),
                height = rendered.height(),
                "rendered thumbnail"
            );
            let bytes =
                encode(rendered, def.spec.format(), def.spec.quality()).map_err(failed(def))?;
            Ok(RenderedThumbnail {
                key: def.key.clone(),
                filename: def.filename(original),
                bytes,
            })
        })
        .collect()
}
