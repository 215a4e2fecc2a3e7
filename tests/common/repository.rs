//! Working directory setup utilities
//!
//! Provides functions for creating gnit working directories and files, and
//! for running the binary against them in isolation.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use gnit::core::error::Result;
use gnit::core::state::LocalRepo;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const TEST_REALM: &str = "gno.land/r/demo/myrepo";

/// Test working directory. The TempDir must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn staged(&self) -> Result<Vec<String>> {
        Ok(LocalRepo::open(&self.path)?.staged().to_vec())
    }
}

/// Empty temporary directory, not yet bound to a realm
pub fn setup_empty_dir() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();
    Ok(TestRepo { temp_dir, path })
}

/// Temporary directory with a `.gnit` record bound to [`TEST_REALM`]
pub fn setup_test_repo() -> Result<TestRepo> {
    let repo = setup_empty_dir()?;
    LocalRepo::init(&repo.path, TEST_REALM)?;
    Ok(repo)
}

/// Creates a file (and its parent directories) with the given content
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}

/// Creates multiple test files with sequential content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("package demo\n\n// file {}\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}

/// The `gnit` binary running in `repo_path`, with its config directory
/// isolated and an evaluator binary that cannot be started.
pub fn gnit_cmd(repo_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gnit").expect("gnit binary is built");
    cmd.current_dir(repo_path)
        .env("XDG_CONFIG_HOME", repo_path.join(".test-config"))
        .env("GNIT_GNOKEY_BIN", "/nonexistent/gnokey-for-tests")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
