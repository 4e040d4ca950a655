//! Configuration service implementation.
//!
//! Loads the tracker configuration from `config.toml` in the config
//! directory and caches it.

use oatrack_core::config::TrackerConfig;
use oatrack_core::error::{OatrackError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::paths::OatrackPaths;
use crate::storage::AtomicTomlFile;

/// Configuration service that loads and caches the tracker configuration.
///
/// A missing file is created with defaults on first load.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<TrackerConfig>>,
    /// Cached configuration, filled lazily on first access.
    config: Arc<RwLock<Option<TrackerConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the resolved config directory.
    pub fn new(paths: &OatrackPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service reading the given file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// - `OatrackError::Serialization` if the file is not valid TOML
    /// - `OatrackError::Config` if a value is out of range
    pub fn get_config(&self) -> Result<TrackerConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|e| OatrackError::internal(format!("config cache poisoned: {}", e)))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_config()?;
        loaded.validate()?;

        let mut cached = self
            .config
            .write()
            .map_err(|e| OatrackError::internal(format!("config cache poisoned: {}", e)))?;
        *cached = Some(loaded.clone());

        Ok(loaded)
    }

    /// Writes `config` to disk and replaces the cached copy.
    pub fn save(&self, config: &TrackerConfig) -> Result<()> {
        config.validate()?;
        self.file.save(config)?;

        let mut cached = self
            .config
            .write()
            .map_err(|e| OatrackError::internal(format!("config cache poisoned: {}", e)))?;
        *cached = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn load_config(&self) -> Result<TrackerConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                let default_config = TrackerConfig::default();
                tracing::info!(
                    "[ConfigService] Writing default configuration to {:?}",
                    self.file.path()
                );
                self.file.save(&default_config)?;
                Ok(default_config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oatrack_core::store::StoreKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&OatrackPaths::new(Some(temp_dir.path()))).unwrap();

        let config = service.get_config().unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert!(temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[store]\nbackend = \"document\"\n\n[view]\npage_size = 5\n",
        )
        .unwrap();

        let config = ConfigService::with_path(path).get_config().unwrap();
        assert_eq!(config.store.backend, StoreKind::Document);
        assert_eq!(config.view.page_size, 5);
    }

    #[test]
    fn test_invalid_page_size_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[view]\npage_size = 0\n").unwrap();

        let err = ConfigService::with_path(path).get_config().unwrap_err();
        assert!(matches!(err, OatrackError::Config(_)));
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());
        assert_eq!(service.get_config().unwrap().view.page_size, 10);

        std::fs::write(&path, "[view]\npage_size = 3\n").unwrap();
        assert_eq!(service.get_config().unwrap().view.page_size, 10);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().view.page_size, 3);
    }

    #[test]
    fn test_save_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let mut config = TrackerConfig::default();
        config.store.backend = StoreKind::Static;
        service.save(&config).unwrap();
        service.invalidate_cache();

        assert_eq!(service.get_config().unwrap().store.backend, StoreKind::Static);
    }
}
