use crate::core::{
    bundle::FileBundle,
    command_init::CommandContext,
    config::ClientConfig,
    error::{GnitError, Result},
    evaluator::Evaluator,
    print_file_action, print_section_header, print_success,
};
use std::fs;
use std::path::Path;

/// Commit every staged file to the realm with `message`.
///
/// All staged files must be readable; the first unreadable one aborts the
/// commit before anything is broadcast. The staging index is cleared only
/// after the broadcast succeeded. Returns the program output.
pub fn execute_commit<E: Evaluator + Sync + ?Sized>(
    root: &Path,
    evaluator: &E,
    config: &ClientConfig,
    message: &str,
) -> Result<String> {
    let mut ctx = CommandContext::open(root, evaluator, config)?;

    if ctx.repo.staged().is_empty() {
        return Err(GnitError::NothingStaged);
    }

    println!("Committing with message: '{message}'...");

    let mut files = FileBundle::new();
    for path in ctx.repo.staged() {
        let content = fs::read(ctx.root().join(path))
            .map_err(|e| GnitError::partial_failure(path, e.into()))?;
        files.insert(path.clone(), content);
    }

    print_section_header(&format!("Files to commit ({})", files.len()));
    for (path, content) in &files {
        print_file_action("commit", path, Some(content.len()));
    }

    let output = ctx.client.commit(message, &files)?;
    if !output.is_empty() {
        println!("\n{output}");
    }

    let cleared = ctx.repo.unstage_all()?;
    log::debug!("Cleared {} staged path(s) after commit", cleared.len());

    print_success("Commit successful!");
    Ok(output)
}
