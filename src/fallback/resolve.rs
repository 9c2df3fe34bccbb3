//! Dotted-path traversal over dynamic values.
//!
//! [`resolve`] walks a [`FallbackPath`] from a root [`Value`], one segment at
//! a time. Each step dispatches on the shape of the current value:
//!
//! | Segment | Current value | Lookup |
//! |---|---|---|
//! | index | `List` | element by position |
//! | index | `Object` | [`Object::item`](crate::value::Object::item) |
//! | index or name | `Map` | key, using the segment text verbatim |
//! | name | `Object` | [`Object::attr`](crate::value::Object::attr) |
//! | anything | scalar, `Null`, callable | not found |
//!
//! When a *named* lookup lands on a [`Value::Callable`], it is called once and
//! traversal continues on its result. Indexed elements are never called.
//!
//! ## Broken chains
//!
//! The first step that finds nothing ends traversal with
//! [`Resolution::NotFound`]. Missing attributes, missing keys, out-of-range
//! indices and `Null` intermediates all behave the same way: later segments
//! are not looked at and callables further down the path are not invoked.
//! A broken chain is an ordinary outcome, never an error.

use super::path::{FallbackPath, PathError, Segment};
use crate::value::Value;

/// Outcome of walking a fallback path.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Every segment resolved. The value may still be `Null`.
    Found(Value),
    /// The chain broke at segment `depth` (zero-based).
    NotFound { depth: usize },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// The usable fallback value: `None` when the chain broke or ended on
    /// `Null`.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolution::Found(v) if !v.is_null() => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::Found(v) if !v.is_null() => Some(v),
            _ => None,
        }
    }
}

/// Result of a single traversal step.
#[derive(Debug)]
enum Step {
    Found(Value),
    Indexed(Value),
    NotFound,
}

fn step(current: &Value, segment: &Segment) -> Step {
    match (current, segment) {
        (Value::List(items), Segment::Index { position, .. }) => {
            items.get(*position).cloned().map_or(Step::NotFound, Step::Indexed)
        }
        (Value::Object(obj), Segment::Index { position, .. }) => {
            obj.item(*position).map_or(Step::NotFound, Step::Indexed)
        }
        (Value::Map(entries), segment) => entries
            .get(segment.as_str())
            .cloned()
            .map_or(Step::NotFound, Step::Found),
        (Value::Object(obj), Segment::Name(name)) => {
            obj.attr(name).map_or(Step::NotFound, Step::Found)
        }
        _ => Step::NotFound,
    }
}

/// Walk `path` from `root`.
pub fn resolve(root: &Value, path: &FallbackPath) -> Resolution {
    let mut current = root.clone();

    for (depth, segment) in path.segments().iter().enumerate() {
        current = match step(&current, segment) {
            Step::Found(Value::Callable(f)) => f.call(),
            Step::Found(value) | Step::Indexed(value) => value,
            Step::NotFound => {
                tracing::trace!(
                    %path,
                    depth,
                    segment = segment.as_str(),
                    on = current.kind(),
                    "fallback path broke"
                );
                return Resolution::NotFound { depth };
            }
        };
    }

    Resolution::Found(current)
}

/// Parse `path` and walk it from `root`.
pub fn resolve_str(root: &Value, path: &str) -> Result<Resolution, PathError> {
    let path = FallbackPath::parse(path)?;
    Ok(resolve(root, &path))
}
