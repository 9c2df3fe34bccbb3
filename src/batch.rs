//! Batch thumbnail rendering for the CLI.
//!
//! Renders the thumbnails of many source files and writes them under an
//! output directory, mirroring each source's storage name:
//!
//! ```text
//! photos/2024/sunset.jpg  →  out/2024/list.sunset.jpg
//!                            out/2024/detail.sunset.jpg
//! ```
//!
//! ## Failure handling
//!
//! Asking for a thumbnail key that is not declared fails the whole batch
//! before any source is read. A source that cannot be read or rendered is
//! logged, reported as [`SourceOutcome::Skipped`], and the batch moves on.
//! Failing to write an output file aborts the batch.
//!
//! Thumbnail filenames only keep the source's stem, so `sunset.jpg` and
//! `sunset.png` claim the same outputs. Filenames are claimed in input order
//! before anything renders; a source that would overwrite an earlier
//! source's thumbnail is skipped.
//!
//! ## Parallel Processing
//!
//! Sources are rendered in parallel on the global [rayon](https://docs.rs/rayon)
//! pool. Each render works on its own decoded buffer; results come back in
//! input order.

use crate::imaging::CodecConfig;
use crate::sources::Source;
use crate::thumbnails::{RenderedThumbnail, ThumbnailDef, ThumbnailError, ThumbnailSet};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Thumbnails(#[from] ThumbnailError),
}

/// A thumbnail written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenThumbnail {
    pub key: String,
    pub filename: String,
    pub bytes: usize,
}

/// What happened to one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Rendered {
        name: String,
        thumbnails: Vec<WrittenThumbnail>,
    },
    Skipped {
        name: String,
        reason: String,
    },
}

/// Render the thumbnails of every source into `output_dir`.
///
/// `only` restricts rendering to the named keys; empty means all.
pub fn render_sources(
    sources: &[Source],
    set: &ThumbnailSet,
    only: &[String],
    codec: &CodecConfig,
    output_dir: &Path,
) -> Result<Vec<SourceOutcome>, BatchError> {
    let defs: Vec<&ThumbnailDef> = if only.is_empty() {
        set.defs().iter().collect()
    } else {
        set.select(only)?
    };
    let conflicts = claim_filenames(sources, &defs);

    sources
        .par_iter()
        .enumerate()
        .map(|(index, source)| match conflicts.get(&index) {
            Some(reason) => Ok(skipped(source, reason.clone())),
            None => render_source(source, set, only, codec, output_dir),
        })
        .collect()
}

/// Skip reasons, by source index, for sources whose thumbnail filenames are
/// already claimed by an earlier source.
fn claim_filenames(sources: &[Source], defs: &[&ThumbnailDef]) -> HashMap<usize, String> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut conflicts = HashMap::new();

    for (index, source) in sources.iter().enumerate() {
        let filenames: Vec<String> = defs.iter().map(|d| d.filename(&source.name)).collect();
        let taken = filenames
            .iter()
            .find_map(|f| owners.get(f).map(|owner| (f, *owner)));
        if let Some((filename, owner)) = taken {
            conflicts.insert(
                index,
                format!("thumbnail {filename} is already written for {owner}"),
            );
            continue;
        }
        for filename in filenames {
            owners.insert(filename, &source.name);
        }
    }
    conflicts
}

fn skipped(source: &Source, reason: String) -> SourceOutcome {
    tracing::warn!(source = %source.name, %reason, "skipping source");
    SourceOutcome::Skipped {
        name: source.name.clone(),
        reason,
    }
}

fn render_source(
    source: &Source,
    set: &ThumbnailSet,
    only: &[String],
    codec: &CodecConfig,
    output_dir: &Path,
) -> Result<SourceOutcome, BatchError> {
    let content = match fs::read(&source.path) {
        Ok(content) => content,
        Err(e) => return Ok(skipped(source, e.to_string())),
    };

    let rendered = if only.is_empty() {
        set.render_all(&source.name, &content, codec)
    } else {
        set.render_selected(only, &source.name, &content, codec)
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e @ ThumbnailError::Render { .. }) => return Ok(skipped(source, e.to_string())),
        Err(e) => return Err(e.into()),
    };

    let thumbnails = rendered
        .into_iter()
        .map(|thumb| write_thumbnail(thumb, output_dir))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SourceOutcome::Rendered {
        name: source.name.clone(),
        thumbnails,
    })
}

fn write_thumbnail(
    thumb: RenderedThumbnail,
    output_dir: &Path,
) -> Result<WrittenThumbnail, BatchError> {
    let path = output_dir.join(&thumb.filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &thumb.bytes)?;
    Ok(WrittenThumbnail {
        key: thumb.key,
        filename: thumb.filename,
        bytes: thumb.bytes.len(),
    })
}
