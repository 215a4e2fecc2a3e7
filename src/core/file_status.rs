//! Type-safe classification of a path in a status report.
//!
//! # Public API
//! - [`FileStatus`]: the five mutually exclusive classifications
//!
//! # Key Features
//! - **Display formatting**: short code and human-readable description
//! - **Sorting logic**: staged entries first, then unstaged, then untracked
//! - **Staging flag**: whether the entry reflects staged intent

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileStatus {
    /// Staged, absent from the committed set
    StagedNew,
    /// Staged, present in the committed set
    StagedModified,
    /// Committed and local, content differs, not staged
    Modified,
    /// Local only, not staged, not committed
    Untracked,
    /// Committed, absent locally, not staged
    Deleted,
}

impl FileStatus {
    pub const ALL: [FileStatus; 5] = [
        FileStatus::StagedNew,
        FileStatus::StagedModified,
        FileStatus::Modified,
        FileStatus::Deleted,
        FileStatus::Untracked,
    ];

    /// Two-column `XY` code: staged changes in the first column, unstaged
    /// ones in the second
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::StagedNew => "A ",
            FileStatus::StagedModified => "M ",
            FileStatus::Modified => " M",
            FileStatus::Untracked => "??",
            FileStatus::Deleted => " D",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileStatus::StagedNew => "new file",
            FileStatus::StagedModified => "modified",
            FileStatus::Modified => "modified",
            FileStatus::Untracked => "untracked",
            FileStatus::Deleted => "deleted",
        }
    }

    /// Get sort priority for status ordering
    pub fn sort_priority(&self) -> u8 {
        match self {
            FileStatus::StagedNew => 0,
            FileStatus::StagedModified => 1,
            FileStatus::Modified => 2,
            FileStatus::Deleted => 3,
            FileStatus::Untracked => 4,
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, FileStatus::StagedNew | FileStatus::StagedModified)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
