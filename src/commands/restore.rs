use crate::core::{
    command_init::CommandContext,
    config::ClientConfig,
    error::{GnitError, Result},
    evaluator::Evaluator,
    print_file_action, print_info, print_success, print_warning,
    state::LocalRepo,
    worktree::{normalize_path, write_file},
};
use std::path::{Path, PathBuf};

/// Restore working-tree files from the realm, or unstage with `staged`.
///
/// Without paths every committed file (or every staged path) is affected.
/// Paths that are not committed (or not staged) are reported and skipped;
/// a write failure aborts. Returns the number of files restored or unstaged.
pub fn execute_restore<E: Evaluator + Sync + ?Sized>(
    root: &Path,
    evaluator: &E,
    config: &ClientConfig,
    staged: bool,
    paths: &[PathBuf],
) -> Result<usize> {
    let paths: Vec<String> = paths.iter().map(|p| normalize_path(p)).collect();

    if staged {
        restore_staged(root, &paths)
    } else {
        restore_working_tree(root, evaluator, config, &paths)
    }
}

fn restore_staged(root: &Path, paths: &[String]) -> Result<usize> {
    let mut repo = LocalRepo::open(root)?;

    if paths.is_empty() {
        let removed = repo.unstage_all()?;
        if removed.is_empty() {
            print_info("No files are staged");
        } else {
            print_success(&format!("Unstaged {} file(s)", removed.len()));
        }
        return Ok(removed.len());
    }

    let outcome = repo.unstage(paths)?;
    for path in &outcome.not_staged {
        print_warning(&format!("'{path}' is not staged"));
    }

    if outcome.removed.is_empty() {
        print_info("No matching staged files found");
        return Ok(0);
    }

    for path in &outcome.removed {
        print_file_action("unstaged", path, None);
    }
    print_success(&format!("{} file(s) unstaged", outcome.removed.len()));
    Ok(outcome.removed.len())
}

fn restore_working_tree<E: Evaluator + Sync + ?Sized>(
    root: &Path,
    evaluator: &E,
    config: &ClientConfig,
    paths: &[String],
) -> Result<usize> {
    let ctx = CommandContext::open(root, evaluator, config)?;
    let committed = ctx.client.fetch_bundle()?;

    let selected: Vec<(&String, &Vec<u8>)> = if paths.is_empty() {
        if committed.is_empty() {
            print_info("No files found in repository to restore");
            return Ok(0);
        }
        println!("Restoring {} file(s) from repository...", committed.len());
        committed.iter().collect()
    } else {
        paths
            .iter()
            .filter_map(|path| match committed.get_key_value(path) {
                Some(entry) => Some(entry),
                None => {
                    print_warning(&format!("'{path}' not found in repository"));
                    None
                }
            })
            .collect()
    };

    for (path, content) in &selected {
        write_file(ctx.root(), path, content)
            .map_err(|e| GnitError::partial_failure(path.as_str(), e))?;
        print_file_action("restored", path, Some(content.len()));
    }

    if selected.is_empty() {
        print_info("No files were restored");
    } else {
        print_success(&format!("Successfully restored {} file(s)", selected.len()));
    }
    Ok(selected.len())
}
