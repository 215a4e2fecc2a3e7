use crate::core::{
    command_init::CommandContext,
    config::ClientConfig,
    error::{GnitError, Result},
    evaluator::Evaluator,
    print_file_action, print_info, print_success, print_warning,
    realm::RealmClient,
    worktree::{normalize_path, write_file},
};
use std::path::Path;

/// Fetch one file, or every committed file, into the working tree.
///
/// With `source`, the realm's own source files are fetched as well. Source
/// files that cannot be read are skipped with a warning; any write failure
/// aborts. Returns the number of files written.
pub fn execute_pull<E: Evaluator + Sync + ?Sized>(
    root: &Path,
    evaluator: &E,
    config: &ClientConfig,
    file: Option<&str>,
    source: bool,
) -> Result<usize> {
    let ctx = CommandContext::open(root, evaluator, config)?;

    if let Some(file) = file {
        return pull_file(&ctx.client, ctx.root(), file);
    }

    let mut written = match pull_all(&ctx.client, ctx.root()) {
        Ok(count) => count,
        Err(e) if source => {
            log::warn!("Pulling committed files failed: {e}");
            print_warning(&format!("Repository not readable ({e}), pulling realm source only"));
            0
        }
        Err(e) => return Err(e),
    };

    if source {
        written += pull_source(&ctx.client, ctx.root())?;
    }

    Ok(written)
}

fn pull_file<E: Evaluator + Sync + ?Sized>(
    client: &RealmClient<'_, E>,
    root: &Path,
    file: &str,
) -> Result<usize> {
    let name = normalize_path(Path::new(file));
    println!("Pulling '{name}'...");

    let content = client
        .pull_file(&name)?
        .ok_or_else(|| GnitError::file_not_found(&name))?;
    write_file(root, &name, &content)?;

    print_success(&format!(
        "File '{name}' fetched successfully ({} bytes)",
        content.len()
    ));
    Ok(1)
}

/// Write every committed file of the realm into `root`
pub fn pull_all<E: Evaluator + Sync + ?Sized>(
    client: &RealmClient<'_, E>,
    root: &Path,
) -> Result<usize> {
    println!("Pulling all files from {}...", client.realm_path());

    let files = client.fetch_bundle()?;
    if files.is_empty() {
        print_info("No files found in repository");
        return Ok(0);
    }

    println!("Found {} file(s), writing to disk...", files.len());
    for (path, content) in &files {
        write_file(root, path, content).map_err(|e| GnitError::partial_failure(path, e))?;
        print_file_action("pulled", path, Some(content.len()));
    }

    print_success(&format!("Successfully pulled {} file(s)", files.len()));
    Ok(files.len())
}

fn pull_source<E: Evaluator + Sync + ?Sized>(
    client: &RealmClient<'_, E>,
    root: &Path,
) -> Result<usize> {
    println!("\nFetching realm source files...");

    let names = client.list_source_files()?;
    if names.is_empty() {
        print_info("No source files found in realm");
        return Ok(0);
    }

    println!("Found {} source file(s), pulling...", names.len());
    let mut written = 0;
    for name in &names {
        let content = match client.source_file(name) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping source file {name}: {e}");
                print_warning(&format!("failed to pull '{name}': {e}"));
                continue;
            }
        };

        write_file(root, name, content.as_bytes())
            .map_err(|e| GnitError::partial_failure(name, e))?;
        print_file_action("pulled", name, Some(content.len()));
        written += 1;
    }

    Ok(written)
}
