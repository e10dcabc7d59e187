//! Copies of the upstream `.proto` files for the SDK build.
//!
//! The SDK compiles its own copy of the schema with a different Java package
//! and a flat directory layout, so every file is rewritten on the way over.

use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::generator::TextReplacements;

/// `import "a/b/c.proto";` with the file name captured.
#[allow(clippy::expect_used)]
static IMPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import ".*/(.*\.proto)""#).expect("import regex should be valid"));

/// Point nested imports at the flattened file name.
///
/// `google/...` imports come from protobuf itself and are left alone.
pub fn flatten_imports(text: &str) -> String {
    IMPORT_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            if caps[0].contains("google") {
                caps[0].to_string()
            } else {
                format!("import \"{}\"", &caps[1])
            }
        })
        .into_owned()
}

/// Remove everything in `dir` except the `preserve` names.
///
/// A missing directory is not an error; entries that cannot be removed are
/// logged and skipped.
pub fn clear_dir(dir: &Path, preserve: &[String]) -> anyhow::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name();
        if preserve.iter().any(|keep| name.to_str() == Some(keep.as_str())) {
            continue;
        }
        let path = entry.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove"),
        }
    }
    info!(dir = %dir.display(), removed, "Cleared directory");
    Ok(removed)
}

/// Copy every `.proto` under `in_dir` into `out_dir`, rewritten for the SDK.
///
/// Files are flattened into `out_dir`. Per-file failures are logged and the
/// remaining files are still copied. Returns the number of files written.
pub fn copy_modified_protos(
    in_dir: &Path,
    out_dir: &Path,
    replacements: &TextReplacements,
) -> anyhow::Result<usize> {
    if !in_dir.exists() {
        warn!(dir = %in_dir.display(), "Proto input directory does not exist");
        return Ok(0);
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = 0;
    for entry in WalkDir::new(in_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "proto") {
            continue;
        }
        let target = out_dir.join(entry.file_name());
        match rewrite_proto(path, &target, replacements) {
            Ok(()) => written += 1,
            Err(e) => warn!(file = %path.display(), error = %format!("{e:#}"), "Failed to copy proto"),
        }
    }
    info!(from = %in_dir.display(), to = %out_dir.display(), files = written, "Copied modified protos");
    Ok(written)
}

fn rewrite_proto(from: &Path, to: &Path, replacements: &TextReplacements) -> anyhow::Result<()> {
    let text = fs::read_to_string(from)
        .with_context(|| format!("Failed to read {}", from.display()))?;
    let text = flatten_imports(&replacements.apply(&text));
    fs::write(to, text).with_context(|| format!("Failed to write {}", to.display()))
}
