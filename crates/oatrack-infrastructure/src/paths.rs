//! Unified path management for oatrack files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/oatrack/           # Config directory
//! └── config.toml              # Tracker configuration
//!
//! ~/.local/share/oatrack/      # Data directory
//! ├── answers.json             # Local store blob (key "answers")
//! └── exports/                 # Default export target
//!     └── answers.json
//! ```
//!
//! Passing a base directory to `OatrackPaths::new` puts both trees under it,
//! which is what tests and `--config-dir` do.

use oatrack_core::OatrackError;
use oatrack_core::export::EXPORT_FILE_NAME;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "oatrack";

/// Key of the single blob the local store keeps all records under.
pub const LOCAL_STORE_KEY: &str = "answers";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for OatrackError {
    fn from(err: PathError) -> Self {
        OatrackError::config(err.to_string())
    }
}

/// Path resolver rooted either at the platform directories or at an explicit
/// base directory.
#[derive(Debug, Clone, Default)]
pub struct OatrackPaths {
    base_dir: Option<PathBuf>,
}

impl OatrackPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/oatrack/`, or the base directory
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory, e.g. `~/.local/share/oatrack/`.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the file backing the local store blob.
    pub fn local_store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join(format!("{}.json", LOCAL_STORE_KEY)))
    }

    /// Returns where `export` writes when no directory is given.
    pub fn export_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("exports"))
    }

    pub fn export_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.export_dir()?.join(EXPORT_FILE_NAME))
    }
}
