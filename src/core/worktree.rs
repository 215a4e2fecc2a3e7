//! Working-tree scanning and writing.
//!
//! Paths handed to the rest of the crate are relative to the repository root,
//! forward-slash separated, with no leading `./`.

use crate::core::bundle::FileBundle;
use crate::core::error::{GnitError, Result};
use crate::core::ignore::IgnoreMatcher;
use std::fs;
use std::io;
use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};

/// Repository-relative form of `path`
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn relative_to(root: &Path, entry: &DirEntry) -> Option<String> {
    entry
        .path()
        .strip_prefix(root)
        .ok()
        .map(normalize_path)
        .filter(|p| !p.is_empty())
}

/// Every non-ignored file under `root` with its content.
///
/// Unreadable files and directories are skipped with a warning.
pub fn collect_files(root: &Path, matcher: &dyn IgnoreMatcher) -> Result<FileBundle> {
    let mut files = FileBundle::new();

    for path in walk(root, root, matcher) {
        match fs::read(root.join(&path)) {
            Ok(content) => {
                files.insert(path, content);
            }
            Err(e) => log::warn!("Unable to read {path}: {e}"),
        }
    }

    log::debug!("Collected {} file(s) from {}", files.len(), root.display());
    Ok(files)
}

/// Expand a user-supplied path (file or directory) into non-ignored file paths
pub fn expand_path(root: &Path, target: &Path, matcher: &dyn IgnoreMatcher) -> Result<Vec<String>> {
    let absolute = root.join(target);
    let metadata = fs::metadata(&absolute)
        .map_err(|_| GnitError::file_not_found(target))?;

    let relative = normalize_path(target);
    if !relative.is_empty() && matcher.is_ignored(&relative) {
        log::debug!("{relative} is ignored");
        return Ok(Vec::new());
    }

    if metadata.is_dir() {
        Ok(walk(root, &absolute, matcher))
    } else {
        Ok(vec![relative])
    }
}

fn walk(root: &Path, start: &Path, matcher: &dyn IgnoreMatcher) -> Vec<String> {
    let mut paths = Vec::new();

    let entries = WalkDir::new(start)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| match relative_to(root, e) {
            Some(rel) => !matcher.is_ignored(&rel),
            None => true,
        });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(rel) = relative_to(root, &entry) {
            paths.push(rel);
        }
    }

    paths
}

/// Write `content` to the repository-relative `path`, creating parent
/// directories as needed. Paths leaving the repository are rejected.
pub fn write_file(root: &Path, path: &str, content: &[u8]) -> Result<()> {
    let relative = Path::new(path);
    let target = root.join(relative);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || !contained {
        return Err(GnitError::write_failed(
            target,
            io::Error::new(io::ErrorKind::InvalidInput, "path leaves the repository"),
        ));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| GnitError::write_failed(parent, e))?;
    }
    fs::write(&target, content).map_err(|e| GnitError::write_failed(&target, e))?;
    log::debug!("Wrote {} byte(s) to {path}", content.len());
    Ok(())
}
