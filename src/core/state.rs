//! Local repository state.
//!
//! The `.gnit` file at the root of a working directory records which realm
//! the directory is bound to and which paths are staged for the next commit.
//!
//! # Public API
//! - [`RepoRecord`]: the serialized record
//! - [`LocalRepo`]: a loaded record bound to its directory
//!
//! # Persistence
//! - **JSON serialization**: human-readable record, pretty printed
//! - **Write-through**: every mutation rewrites the whole record at once
//! - **Atomic replace**: written to a temporary sibling and renamed
//! - **Legacy records**: a plain-text file holding only the realm path is
//!   read as a record with nothing staged; a record without a realm path
//!   takes it from `gnomod.toml`

use crate::core::config::read_module_path;
use crate::core::error::{GnitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the record file inside the working directory
pub const RECORD_FILE: &str = ".gnit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    #[serde(default)]
    pub realm_path: String,
    #[serde(default)]
    pub staged_files: Vec<String>,
}

impl RepoRecord {
    pub fn new(realm_path: impl Into<String>) -> Self {
        Self {
            realm_path: realm_path.into(),
            staged_files: Vec::new(),
        }
    }
}

/// Result of unstaging an explicit list of paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnstageOutcome {
    pub removed: Vec<String>,
    pub not_staged: Vec<String>,
}

/// A working directory bound to a realm
#[derive(Debug)]
pub struct LocalRepo {
    root: PathBuf,
    record: RepoRecord,
}

impl LocalRepo {
    /// Create the record in `root`. Fails if one already exists.
    pub fn init(root: impl Into<PathBuf>, realm_path: impl Into<String>) -> Result<Self> {
        let root = root.into();
        let record_path = root.join(RECORD_FILE);
        if record_path.exists() {
            return Err(GnitError::RepositoryExists { path: root });
        }

        let repo = Self {
            root,
            record: RepoRecord::new(realm_path),
        };
        repo.persist()?;
        log::debug!("Initialized repository record at {}", record_path.display());
        Ok(repo)
    }

    /// Load the record from `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let record_path = root.join(RECORD_FILE);

        if !record_path.exists() {
            return Err(GnitError::not_a_repository(root));
        }

        let content = fs::read_to_string(&record_path)?;
        let content = content.trim();

        let mut record = match serde_json::from_str::<RepoRecord>(content) {
            Ok(record) => record,
            Err(e) if content.is_empty() || content.starts_with('{') => {
                return Err(GnitError::record_parse_failed(&record_path, e));
            }
            Err(_) => {
                log::debug!("Reading legacy plain-text record: {content}");
                RepoRecord::new(content)
            }
        };

        if record.realm_path.is_empty() {
            record.realm_path = read_module_path(&root)?.ok_or(GnitError::NoRealmPath)?;
            log::debug!("Realm path taken from gnomod.toml: {}", record.realm_path);
        }

        log::debug!(
            "Loaded record for {} with {} staged file(s)",
            record.realm_path,
            record.staged_files.len()
        );
        Ok(Self { root, record })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn realm_path(&self) -> &str {
        &self.record.realm_path
    }

    pub fn record(&self) -> &RepoRecord {
        &self.record
    }

    pub fn staged(&self) -> &[String] {
        &self.record.staged_files
    }

    pub fn is_staged(&self, path: &str) -> bool {
        self.record.staged_files.iter().any(|p| p == path)
    }

    /// Stage every path not already staged. Returns the newly staged paths.
    pub fn stage<I, S>(&mut self, paths: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: HashSet<String> = self.record.staged_files.iter().cloned().collect();
        let mut added = Vec::new();

        for path in paths {
            let path = path.into();
            if known.insert(path.clone()) {
                self.record.staged_files.push(path.clone());
                added.push(path);
            }
        }

        if !added.is_empty() {
            self.persist()?;
        }
        Ok(added)
    }

    /// Unstage the given paths. Paths that were not staged are reported,
    /// not treated as errors.
    pub fn unstage(&mut self, paths: &[String]) -> Result<UnstageOutcome> {
        let wanted: HashSet<&str> = paths.iter().map(String::as_str).collect();
        let mut outcome = UnstageOutcome::default();

        self.record.staged_files.retain(|staged| {
            if wanted.contains(staged.as_str()) {
                outcome.removed.push(staged.clone());
                false
            } else {
                true
            }
        });

        outcome.not_staged = paths
            .iter()
            .filter(|p| !outcome.removed.contains(p))
            .cloned()
            .collect();

        if !outcome.removed.is_empty() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Unstage everything. Returns the paths that were staged.
    pub fn unstage_all(&mut self) -> Result<Vec<String>> {
        let removed = std::mem::take(&mut self.record.staged_files);
        if !removed.is_empty() {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Write the record to a temporary sibling, then rename it into place
    fn persist(&self) -> Result<()> {
        let record_path = self.root.join(RECORD_FILE);
        let tmp_path = self.root.join(format!("{RECORD_FILE}.tmp"));

        let json = serde_json::to_string_pretty(&self.record)?;
        fs::write(&tmp_path, json).map_err(|e| GnitError::write_failed(&tmp_path, e))?;
        fs::rename(&tmp_path, &record_path).map_err(|e| GnitError::write_failed(&record_path, e))?;

        log::debug!(
            "Persisted record with {} staged file(s)",
            self.record.staged_files.len()
        );
        Ok(())
    }
}
