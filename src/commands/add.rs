use crate::core::{
    error::{GnitError, Result},
    ignore::GnitIgnore,
    print_file_action, print_info, print_success,
    state::LocalRepo,
    worktree::expand_path,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Stage files and directories. Directories are expanded recursively and
/// ignored paths are skipped. Returns the newly staged paths.
pub fn execute_add(root: &Path, paths: &[PathBuf]) -> Result<Vec<String>> {
    if paths.is_empty() {
        return Err(GnitError::NoPathsGiven);
    }

    let mut repo = LocalRepo::open(root)?;
    let matcher = GnitIgnore::load(root)?;

    let mut candidates = BTreeSet::new();
    for path in paths {
        candidates.extend(expand_path(root, path, &matcher)?);
    }
    log::debug!("{} candidate path(s) to stage", candidates.len());

    let added = repo.stage(candidates)?;
    if added.is_empty() {
        print_info("No new files to add");
        return Ok(added);
    }

    for path in &added {
        print_file_action("added", path, None);
    }
    print_success(&format!("{} file(s) staged for commit", added.len()));

    Ok(added)
}
