//! Classification of the working tree against the committed files.
//!
//! [`diff`] takes the committed bundle, the staged paths and the local bundle
//! and assigns every path of their union to one [`FileStatus`], or records it
//! as unchanged when it is committed, present locally with identical bytes
//! and not staged.
//!
//! Staged paths always land in a staged bucket, even when the working copy
//! has since been deleted.

use crate::core::bundle::FileBundle;
use crate::core::file_status::FileStatus;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
}

/// Ordered result of a diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    entries: Vec<StatusEntry>,
    unchanged: Vec<String>,
}

impl StatusReport {
    /// Entries sorted by status priority, then by path
    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// Committed paths with identical local content
    pub fn unchanged(&self) -> &[String] {
        &self.unchanged
    }

    pub fn bucket(&self, status: FileStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.path.as_str())
            .collect()
    }

    pub fn status_of(&self, path: &str) -> Option<FileStatus> {
        self.entries.iter().find(|e| e.path == path).map(|e| e.status)
    }

    pub fn has_staged(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_staged())
    }

    pub fn has_unstaged(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.status, FileStatus::Modified | FileStatus::Deleted))
    }

    pub fn has_untracked(&self) -> bool {
        self.entries.iter().any(|e| e.status == FileStatus::Untracked)
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify every path seen in `committed`, `staged` or `local`
pub fn diff(committed: &FileBundle, staged: &[String], local: &FileBundle) -> StatusReport {
    let staged: BTreeSet<&str> = staged.iter().map(String::as_str).collect();
    let union: BTreeSet<&str> = committed
        .keys()
        .chain(local.keys())
        .map(String::as_str)
        .chain(staged.iter().copied())
        .collect();

    let mut classified: BTreeMap<(u8, &str), FileStatus> = BTreeMap::new();
    let mut unchanged = Vec::new();

    for path in union {
        let in_commit = committed.get(path);
        let in_local = local.get(path);

        let status = if staged.contains(path) {
            if in_commit.is_some() {
                FileStatus::StagedModified
            } else {
                FileStatus::StagedNew
            }
        } else {
            match (in_commit, in_local) {
                (Some(committed), Some(local)) if committed == local => {
                    unchanged.push(path.to_string());
                    continue;
                }
                (Some(_), Some(_)) => FileStatus::Modified,
                (Some(_), None) => FileStatus::Deleted,
                (None, Some(_)) => FileStatus::Untracked,
                (None, None) => continue,
            }
        };

        classified.insert((status.sort_priority(), path), status);
    }

    let entries = classified
        .into_iter()
        .map(|((_, path), status)| StatusEntry {
            path: path.to_string(),
            status,
        })
        .collect();

    StatusReport { entries, unchanged }
}
