use std::path::PathBuf;

use directories::ProjectDirs;

/// Returns the shopfront data directory.
///
/// Resolution order:
/// 1. `SHOPFRONT_HOME` environment variable (if set)
/// 2. Platform data directory (e.g. `~/.local/share/shopfront`)
/// 3. Current working directory + `.shopfront`
pub fn shop_home() -> PathBuf {
    if let Ok(root) = std::env::var("SHOPFRONT_HOME")
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    ProjectDirs::from("", "", "shopfront")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".shopfront"))
}

/// Returns the path to the YAML configuration file.
pub fn config_path() -> PathBuf {
    shop_home().join("config.yaml")
}

/// Returns the path to the cookie jar holding `token` and `user`.
pub fn cookie_jar_path() -> PathBuf {
    shop_home().join("cookies.json")
}

/// Returns the path to the local key/value store.
pub fn local_storage_path() -> PathBuf {
    shop_home().join("local_storage.json")
}
