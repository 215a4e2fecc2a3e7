//! Unified color system for file status output.
//!
//! # Public API
//! - [`get_status_color_style`]: Get color function for a file status
//! - [`get_aligned_status`]: Get properly aligned colored status code
//! - [`get_colored_path`]: Apply status color to file paths
//!
//! # Color Scheme
//! - **Staged**: Green for anything that will be committed
//! - **Modified**: Yellow for unstaged modifications
//! - **Deleted**: Red for committed files missing locally
//! - **Untracked**: Cyan for files the realm has never seen

use crate::core::file_status::FileStatus;
use colored::*;

/// Returns a closure that applies the color for `status` to any text
pub fn get_status_color_style(status: FileStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        FileStatus::StagedNew | FileStatus::StagedModified => Box::new(|text: &str| text.green()),
        FileStatus::Modified => Box::new(|text: &str| text.yellow()),
        FileStatus::Deleted => Box::new(|text: &str| text.red()),
        FileStatus::Untracked => Box::new(|text: &str| text.cyan()),
    }
}

/// Get the colored two-column status code
pub fn get_aligned_status(status: FileStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(status.as_str())
}

pub fn get_colored_path(status: FileStatus, path: &str) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(path)
}
