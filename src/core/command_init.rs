//! Centralized initialization for repository-scoped commands.
//!
//! Every command except `init` and `clone` starts the same way: open the
//! `.gnit` record of the working directory and bind a [`RealmClient`] to the
//! realm it names. [`CommandContext`] bundles the result.
//!
//! # Initialization Steps
//! 1. **Repository validation**: the `.gnit` record must exist
//! 2. **Record loading**: realm path and staging index
//! 3. **Client binding**: realm client built from the loaded config

use crate::core::config::ClientConfig;
use crate::core::error::Result;
use crate::core::evaluator::Evaluator;
use crate::core::realm::RealmClient;
use crate::core::state::LocalRepo;
use std::path::Path;

pub struct CommandContext<'a, E: Evaluator + Sync + ?Sized> {
    pub repo: LocalRepo,
    pub client: RealmClient<'a, E>,
}

impl<'a, E: Evaluator + Sync + ?Sized> CommandContext<'a, E> {
    /// Open the repository at `root` and bind a client to its realm
    pub fn open(root: &Path, evaluator: &'a E, config: &ClientConfig) -> Result<Self> {
        let repo = LocalRepo::open(root)?;
        log::debug!(
            "Opened repository at {} bound to {}",
            root.display(),
            repo.realm_path()
        );
        let client = RealmClient::new(evaluator, repo.realm_path(), config);
        Ok(Self { repo, client })
    }

    pub fn root(&self) -> &Path {
        self.repo.root()
    }
}
