//! Atomic whole-file storage for JSON and TOML documents.
//!
//! The whole document is rewritten on every save: serialize, write to a
//! sibling temp file, fsync, rename over the original.

use oatrack_core::OatrackError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    Io(std::io::Error),
    /// Encoding or decoding failed.
    Format {
        format: &'static str,
        message: String,
    },
    /// File locking error.
    Lock(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::Io(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::Format { format, message } => {
                write!(f, "{} error: {}", format, message)
            }
            AtomicFileError::Lock(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::Io(e)
    }
}

impl From<AtomicFileError> for OatrackError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            AtomicFileError::Format { format, message } => OatrackError::Serialization {
                format: format.to_string(),
                message,
            },
            AtomicFileError::Lock(message) => OatrackError::io(message),
        }
    }
}

/// Encoding used by an `AtomicFile`.
pub trait FileFormat {
    const NAME: &'static str;

    fn encode<T: Serialize>(value: &T) -> Result<String, AtomicFileError>;

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T, AtomicFileError>;

    fn error(message: impl std::fmt::Display) -> AtomicFileError {
        AtomicFileError::Format {
            format: Self::NAME,
            message: message.to_string(),
        }
    }
}

/// Pretty-printed JSON.
pub struct Json;

impl FileFormat for Json {
    const NAME: &'static str = "JSON";

    fn encode<T: Serialize>(value: &T) -> Result<String, AtomicFileError> {
        serde_json::to_string_pretty(value).map_err(Self::error)
    }

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T, AtomicFileError> {
        serde_json::from_str(content).map_err(Self::error)
    }
}

/// Pretty-printed TOML.
pub struct Toml;

impl FileFormat for Toml {
    const NAME: &'static str = "TOML";

    fn encode<T: Serialize>(value: &T) -> Result<String, AtomicFileError> {
        toml::to_string_pretty(value).map_err(Self::error)
    }

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T, AtomicFileError> {
        toml::from_str(content).map_err(Self::error)
    }
}

/// A handle to a document file with atomic replacement.
///
/// Provides:
/// - **Atomicity**: updates are all-or-nothing via tmp file + rename
/// - **Isolation**: `update` holds an exclusive lock for read-modify-write
/// - **Durability**: explicit fsync before rename
pub struct AtomicFile<T, F> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> (T, F)>,
}

/// JSON document file.
pub type AtomicJsonFile<T> = AtomicFile<T, Json>;

/// TOML document file.
pub type AtomicTomlFile<T> = AtomicFile<T, Toml>;

impl<T, F> AtomicFile<T, F>
where
    T: Serialize + DeserializeOwned,
    F: FileFormat,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and decodes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and decoded
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        F::decode(&content).map(Some)
    }

    /// Encodes `data` and atomically replaces the file with it.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = F::encode(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `default_value` stands in for a missing file. The result is written
    /// back only if `f` returns `Ok`.
    pub fn update<R, E, U>(&self, default_value: T, f: U) -> Result<R, E>
    where
        E: From<AtomicFileError>,
        U: FnOnce(&mut T) -> Result<R, E>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let parent = self.path.parent().ok_or_else(|| {
            AtomicFileError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicFileError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock held for the duration of an `update`.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicFileError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; removing the file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}
