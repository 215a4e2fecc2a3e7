use crate::core::chunked::DEFAULT_CHUNK_SIZE;
use crate::core::dirs::get_config_directory;
use crate::core::error::{GnitError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How file content is read from the realm
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Size query followed by bounded chunk queries
    Chunked,
    /// One query returning the whole value as a byte slice
    Single,
}

/// Settings for talking to the realm through the evaluator binary
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub gnokey_bin: String,
    pub remote: String,
    pub chain_id: String,
    pub gas_fee: String,
    pub gas_wanted: String,
    pub account: String,
    pub transfer: TransferMode,
    pub chunk_size: usize,
    pub chunk_workers: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gnokey_bin: "gnokey".to_string(),
            remote: "tcp://127.0.0.1:26657".to_string(),
            chain_id: "dev".to_string(),
            gas_fee: "10000000ugnot".to_string(),
            gas_wanted: "5000000000".to_string(),
            account: "test".to_string(),
            transfer: TransferMode::Chunked,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_workers: 1,
        }
    }
}

impl ClientConfig {
    /// Load `config.json` from the user config directory, falling back to
    /// defaults, then apply `GNIT_*` environment overrides.
    pub fn load() -> Result<Self> {
        let config_file = get_config_directory()?.join("config.json");
        let mut config = Self::load_from(&config_file)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 4] = [
            ("GNIT_GNOKEY_BIN", &mut self.gnokey_bin),
            ("GNIT_REMOTE", &mut self.remote),
            ("GNIT_CHAIN_ID", &mut self.chain_id),
            ("GNIT_ACCOUNT", &mut self.account),
        ];

        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                log::debug!("{var} overrides config: {value}");
                *field = value;
            }
        }
    }
}

/// Module descriptor of a Gno package
pub const GNOMOD_FILE: &str = "gnomod.toml";

#[derive(Deserialize)]
struct GnoMod {
    module: Option<String>,
}

/// Read the realm path from the `module` entry of `gnomod.toml` in `dir`.
///
/// Both `module = "path"` and the legacy `module path` line are accepted.
pub fn read_module_path(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(GNOMOD_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    match toml::from_str::<GnoMod>(&content) {
        Ok(gnomod) => Ok(gnomod.module.filter(|m| !m.is_empty())),
        Err(e) => {
            log::debug!("gnomod.toml is not plain TOML ({e}), scanning lines");
            Ok(content.lines().find_map(legacy_module_line))
        }
    }
}

fn legacy_module_line(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("module")?;
    let value = rest.trim().trim_start_matches('=').trim().trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

/// Package alias of a realm path: its last path segment
pub fn package_alias(realm_path: &str) -> Result<&str> {
    realm_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|alias| !alias.is_empty())
        .ok_or_else(|| GnitError::InvalidRealmPath {
            path: realm_path.to_string(),
        })
}
