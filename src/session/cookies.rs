//! File-backed cookie jar.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShopError};

/// Name/value cookie store persisted as a JSON object
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
    /// `None` for jars that never touch the disk
    path: Option<PathBuf>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the jar at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cookies = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                ShopError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read cookie jar at {}: {}", path.display(), e),
                ))
            })?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            cookies,
            path: Some(path),
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: String) {
        self.cookies.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_private(path, &serde_json::to_string_pretty(&self.cookies)?)
    }
}

/// Write a file readable only by its owner
pub(crate) fn write_private(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(|e| {
        ShopError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", path.display(), e),
        ))
    })?;

    // Restrictive permissions on Unix (owner read/write only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
