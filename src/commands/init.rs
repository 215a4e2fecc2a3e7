use crate::core::{
    config::{package_alias, read_module_path},
    error::{GnitError, Result},
    print_success,
    state::LocalRepo,
};
use std::path::Path;

/// Create the `.gnit` record in `root`.
///
/// The realm path comes from `realm`, or from the `module` entry of
/// `gnomod.toml` in `root` when none is given.
pub fn execute_init(root: &Path, realm: Option<String>) -> Result<LocalRepo> {
    let realm_path = match realm {
        Some(realm) => realm,
        None => read_module_path(root)?.ok_or(GnitError::NoRealmPath)?,
    };
    package_alias(&realm_path)?;

    let repo = LocalRepo::init(root, realm_path)?;
    print_success(&format!(
        "Initialized gnit repository with realm: {}",
        repo.realm_path()
    ));
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_with_explicit_realm() -> Result<()> {
        let dir = TempDir::new()?;
        let repo = execute_init(dir.path(), Some("gno.land/r/demo/myrepo".to_string()))?;
        assert_eq!(repo.realm_path(), "gno.land/r/demo/myrepo");
        assert!(dir.path().join(".gnit").exists());
        Ok(())
    }

    #[test]
    fn test_init_from_gnomod() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("gnomod.toml"),
            "module = \"gno.land/r/demo/fromfile\"\n",
        )?;
        let repo = execute_init(dir.path(), None)?;
        assert_eq!(repo.realm_path(), "gno.land/r/demo/fromfile");
        Ok(())
    }

    #[test]
    fn test_init_without_realm() {
        let dir = TempDir::new().unwrap();
        let err = execute_init(dir.path(), None).unwrap_err();
        assert!(matches!(err, GnitError::NoRealmPath));
        assert!(!dir.path().join(".gnit").exists());
    }

    #[test]
    fn test_init_twice() {
        let dir = TempDir::new().unwrap();
        execute_init(dir.path(), Some("gno.land/r/demo/a".to_string())).unwrap();
        let err = execute_init(dir.path(), Some("gno.land/r/demo/a".to_string())).unwrap_err();
        assert!(matches!(err, GnitError::RepositoryExists { .. }));
    }
}
