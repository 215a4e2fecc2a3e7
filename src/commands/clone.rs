use crate::commands::pull::pull_all;
use crate::core::{
    config::{package_alias, ClientConfig},
    error::{GnitError, Result},
    evaluator::Evaluator,
    print_success,
    realm::RealmClient,
    state::LocalRepo,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Clone `realm_path` into a new directory under `parent`, named after the
/// realm's last path segment. Returns the new directory.
///
/// The directory is removed again when the realm cannot be reached.
pub fn execute_clone<E: Evaluator + Sync + ?Sized>(
    parent: &Path,
    realm_path: &str,
    evaluator: &E,
    config: &ClientConfig,
) -> Result<PathBuf> {
    let realm_path = realm_path.trim_end_matches('/');
    println!("Cloning repository from '{realm_path}'...");

    let target = parent.join(package_alias(realm_path)?);
    if target.exists() {
        return Err(GnitError::DirectoryExists { path: target });
    }
    fs::create_dir(&target).map_err(|e| GnitError::write_failed(&target, e))?;

    let repo = LocalRepo::init(&target, realm_path)?;
    log::debug!("Created {} for {}", target.display(), repo.realm_path());

    let client = RealmClient::new(evaluator, realm_path, config);
    if let Err(e) = client.probe() {
        log::debug!("Probe failed, removing {}", target.display());
        if let Err(cleanup) = fs::remove_dir_all(&target) {
            log::warn!("Could not remove {}: {cleanup}", target.display());
        }
        return Err(GnitError::realm_unavailable(realm_path, e));
    }

    pull_all(&client, &target)?;

    print_success(&format!(
        "Repository cloned successfully into '{}'",
        target.display()
    ));
    Ok(target)
}
