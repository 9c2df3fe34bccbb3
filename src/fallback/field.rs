//! Fields that fall back to another value when empty.
//!
//! A [`FallbackField`] reads its own attribute from an instance. If that
//! attribute has content, it wins. Otherwise the field's fallback path is
//! resolved against the same instance, typically pointing at a thumbnail of a
//! sibling image field (`artwork.thumbnails.homepage_image`).
//!
//! The path is either fixed at declaration time, or computed from the
//! instance on every read. Fixed paths are parsed up front; computed paths are
//! parsed each time and an invalid one is reported as a [`PathError`].
//!
//! Values obtained through the fallback are marked as such, and
//! [`FallbackField::persistable`] refuses to hand them back for storage: only
//! a value the field owns is ever written.

use super::path::{FallbackPath, PathError};
use super::resolve::resolve;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type PathFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Where a field finds its substitute value.
#[derive(Clone)]
pub enum FallbackSource {
    /// No fallback; an empty field reads as empty.
    None,
    Path(FallbackPath),
    /// Path text computed from the instance at read time.
    Computed(PathFn),
}

impl fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackSource::None => f.write_str("None"),
            FallbackSource::Path(path) => write!(f, "Path({path})"),
            FallbackSource::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// The value a fallback field reads as.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The instance's own, non-empty value.
    Own(Value),
    /// A substitute found through the fallback path.
    Fallback(Value),
    Empty,
}

impl FieldValue {
    pub fn value(&self) -> Option<&Value> {
        match self {
            FieldValue::Own(v) | FieldValue::Fallback(v) => Some(v),
            FieldValue::Empty => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FieldValue::Fallback(_))
    }
}

#[derive(Debug, Clone)]
pub struct FallbackField {
    name: String,
    source: FallbackSource,
}

impl FallbackField {
    /// A field falling back along a fixed path.
    pub fn new(name: impl Into<String>, path: &str) -> Result<Self, PathError> {
        Ok(Self {
            name: name.into(),
            source: FallbackSource::Path(FallbackPath::parse(path)?),
        })
    }

    pub fn with_path(name: impl Into<String>, path: FallbackPath) -> Self {
        Self {
            name: name.into(),
            source: FallbackSource::Path(path),
        }
    }

    /// A field falling back along a path computed from the instance.
    pub fn computed(
        name: impl Into<String>,
        path: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source: FallbackSource::Computed(Arc::new(path)),
        }
    }

    /// A plain field with no fallback.
    pub fn without_fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FallbackSource::None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &FallbackSource {
        &self.source
    }

    /// Read this field from `instance`.
    pub fn read(&self, instance: &Value) -> Result<FieldValue, PathError> {
        let own = own_value(instance, &self.name);
        if !own.is_empty() {
            return Ok(FieldValue::Own(own));
        }

        let resolution = match &self.source {
            FallbackSource::None => return Ok(FieldValue::Empty),
            FallbackSource::Path(path) => resolve(instance, path),
            FallbackSource::Computed(compute) => {
                let path = FallbackPath::parse(&compute(instance))?;
                resolve(instance, &path)
            }
        };

        Ok(match resolution.into_value() {
            Some(value) => {
                tracing::debug!(field = %self.name, "read through fallback");
                FieldValue::Fallback(value)
            }
            None => FieldValue::Empty,
        })
    }

    /// The value to store for this field, if any.
    ///
    /// Fallback values belong to some other field and are never persisted.
    pub fn persistable<'a>(&self, value: &'a FieldValue) -> Option<&'a Value> {
        match value {
            FieldValue::Own(v) => Some(v),
            FieldValue::Fallback(_) | FieldValue::Empty => None,
        }
    }
}

/// The instance's own attribute, without calling callables: a field's stored
/// value is data, not a method.
fn own_value(instance: &Value, name: &str) -> Value {
    let found = match instance {
        Value::Object(obj) => obj.attr(name),
        Value::Map(entries) => entries.get(name).cloned(),
        _ => None,
    };
    found.unwrap_or_default()
}
