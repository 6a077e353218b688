//! File system paths for voicegate state.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for persisted gate state.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.voicegate)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.voicegate`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".voicegate"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.voicegate).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.voicegate/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the key-value store directory (~/.voicegate/store).
    pub fn store_dir(&self) -> PathBuf {
        self.base_dir.join("store")
    }

    /// Ensure the base and store directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        Ok(())
    }
}
