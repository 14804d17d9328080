//! Best-effort on-disk copy of the task list.
//!
//! The mirror is a seed/backup only: it is written after every
//! successful refresh and read once at startup for the first paint. It
//! is never synced back to the server and never treated as truth.

use std::fs;
use std::path::{Path, PathBuf};

use taskdeck_core::Task;
use thiserror::Error;

/// Fixed file name the mirror lives under.
pub const MIRROR_FILE: &str = "saved-tasks.json";

/// Failures while reading or writing the mirror file. Callers treat
/// these as ignorable: a broken mirror only costs the startup seed.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Filesystem access failed.
    #[error("mirror I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but does not hold a task list.
    #[error("mirror contents unreadable: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON file holding the last known task list.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    path: PathBuf,
}

impl LocalMirror {
    /// Mirror at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Mirror at the platform's local data directory, if one exists.
    #[must_use]
    pub fn discover() -> Option<Self> {
        dirs::data_local_dir().map(|dir| Self::new(dir.join("taskdeck").join(MIRROR_FILE)))
    }

    /// Location of the mirror file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the mirrored task list. A missing file is an empty list.
    ///
    /// # Errors
    /// Returns a [`MirrorError`] when the file exists but cannot be read
    /// or parsed.
    pub fn load(&self) -> Result<Vec<Task>, MirrorError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrite the mirror with the full collection.
    ///
    /// # Errors
    /// Returns a [`MirrorError`] when the directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self, tasks: &[Task]) -> Result<(), MirrorError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(tasks)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
