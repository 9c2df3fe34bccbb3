//! Source image discovery for the CLI.
//!
//! Inputs are files or directories. Files are taken as given; directories are
//! walked recursively (in file-name order) for supported image extensions.
//! Each source gets a storage name relative to its input, with `/`
//! separators, which is what thumbnail filenames are derived from:
//!
//! ```text
//! thumbfall render photos/           photos/2024/sunset.jpg → 2024/sunset.jpg
//! thumbfall render photos/cat.png    photos/cat.png         → cat.png
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("input not found: {0}")]
    NotFound(PathBuf),
    #[error("walking {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// A source image and the name its thumbnails are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub name: String,
}

/// Expand `inputs` into source images, in input order.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<Source>, SourceError> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_file() {
            sources.push(Source {
                path: input.clone(),
                name: storage_name(input.file_name().map(Path::new).unwrap_or(input.as_path())),
            });
        } else if input.is_dir() {
            walk_dir(input, &mut sources)?;
        } else {
            return Err(SourceError::NotFound(input.clone()));
        }
    }
    Ok(sources)
}

fn walk_dir(root: &Path, sources: &mut Vec<Source>) -> Result<(), SourceError> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| SourceError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        sources.push(Source {
            path: path.to_path_buf(),
            name: storage_name(relative),
        });
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn storage_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
