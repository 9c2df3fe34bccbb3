//! Fallback values: dotted-path resolution and fields built on it.
//!
//! - **Path**: [`FallbackPath`] parsing and validation
//! - **Resolve**: [`resolve`] walks a path through a [`Value`](crate::value::Value) graph
//! - **Field**: [`FallbackField`] reads an attribute or its fallback

mod field;
mod path;
mod resolve;

pub use field::{FallbackField, FallbackSource, FieldValue};
pub use path::{FallbackPath, PathError, Segment};
pub use resolve::{Resolution, resolve, resolve_str};
