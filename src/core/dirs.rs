use crate::core::error::Result;
use std::path::PathBuf;

/// Directory holding gnit's user-level configuration
pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_default()
                    .join("Library/Application Support")
            }),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join("gnit"))
}
