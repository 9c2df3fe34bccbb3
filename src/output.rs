//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! 001 2024/sunset.jpg
//!     list → 2024/list.sunset.jpg (12.4 KB)
//!     detail → 2024/detail.sunset.jpg (184.0 KB)
//! 002 broken.png
//!     skipped: cannot decode image: ...
//!
//! Rendered 2 thumbnails for 1 source, skipped 1
//! ```
//!
//! ## Resolve
//!
//! The resolved value as pretty JSON, or a `not found` line naming the
//! segment where the chain broke:
//!
//! ```text
//! not found: "artist.bio.text" broke at segment 3 ("text")
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::SourceOutcome;
use crate::fallback::{FallbackPath, FieldValue, Resolution};
use crate::value::Value;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn json_lines(value: &Value) -> Vec<String> {
    format!("{:#}", value.to_json())
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// render
// ============================================================================

/// Format the outcome of a `render` run, one entry per source.
pub fn format_render_output(outcomes: &[SourceOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut thumbnail_count = 0;
    let mut rendered = 0;
    let mut skipped = 0;

    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            SourceOutcome::Rendered { name, thumbnails } => {
                rendered += 1;
                thumbnail_count += thumbnails.len();
                lines.push(format!("{} {}", format_index(i + 1), name));
                for thumb in thumbnails {
                    lines.push(format!(
                        "    {} \u{2192} {} ({})",
                        thumb.key,
                        thumb.filename,
                        format_size(thumb.bytes)
                    ));
                }
            }
            SourceOutcome::Skipped { name, reason } => {
                skipped += 1;
                lines.push(format!("{} {}", format_index(i + 1), name));
                lines.push(format!("    skipped: {}", reason));
            }
        }
    }

    lines.push(String::new());
    let mut summary = format!(
        "Rendered {} for {}",
        plural(thumbnail_count, "thumbnail"),
        plural(rendered, "source")
    );
    if skipped > 0 {
        summary.push_str(&format!(", skipped {}", skipped));
    }
    lines.push(summary);
    lines
}

/// Print render output to stdout.
pub fn print_render_output(outcomes: &[SourceOutcome]) {
    for line in format_render_output(outcomes) {
        println!("{}", line);
    }
}

// ============================================================================
// resolve
// ============================================================================

/// Format the result of walking `path`.
pub fn format_resolution(path: &FallbackPath, resolution: &Resolution) -> Vec<String> {
    match resolution {
        Resolution::Found(value) => json_lines(value),
        Resolution::NotFound { depth } => {
            let segment = path
                .segments()
                .get(*depth)
                .map(|s| s.as_str())
                .unwrap_or_default();
            vec![format!(
                "not found: \"{}\" broke at segment {} (\"{}\")",
                path,
                depth + 1,
                segment
            )]
        }
    }
}

/// Format a fallback field read. Fallback values are marked on a trailing line.
pub fn format_field_value(field: &str, value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::Own(v) => json_lines(v),
        FieldValue::Fallback(v) => {
            let mut lines = json_lines(v);
            lines.push(format!("({} read through fallback)", field));
            lines
        }
        FieldValue::Empty => vec![format!("not found: field \"{}\" is empty", field)],
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
