//! Dotted fallback paths.
//!
//! A path like `artwork.thumbnails.homepage_image` or `gallery.images.0.file`
//! is split on `.` into [`Segment`]s. Segments made only of ASCII digits are
//! [`Segment::Index`]; everything else is a [`Segment::Name`].
//!
//! Paths are parsed once, when a field is declared, so a malformed path is a
//! setup error rather than a runtime surprise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("fallback path is empty")]
    Empty,
    #[error("fallback path {path:?} has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

/// One step of a fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Attribute or mapping key.
    Name(String),
    /// Sequence position. `raw` keeps the original text (`"007"`) for
    /// mapping lookups.
    Index { position: usize, raw: String },
}

impl Segment {
    fn parse(text: &str) -> Self {
        let numeric = text.bytes().all(|b| b.is_ascii_digit());
        match text.parse::<usize>() {
            Ok(position) if numeric => Segment::Index {
                position,
                raw: text.to_string(),
            },
            _ => Segment::Name(text.to_string()),
        }
    }

    /// The segment as written in the path.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Name(name) => name,
            Segment::Index { raw, .. } => raw,
        }
    }
}

/// A parsed, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FallbackPath {
    segments: Vec<Segment>,
}

impl FallbackPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = path
            .split('.')
            .enumerate()
            .map(|(position, text)| {
                if text.is_empty() {
                    Err(PathError::EmptySegment {
                        path: path.to_string(),
                        position,
                    })
                } else {
                    Ok(Segment::parse(text))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: an empty path cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for FallbackPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FallbackPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FallbackPath> for String {
    fn from(path: FallbackPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for FallbackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}
