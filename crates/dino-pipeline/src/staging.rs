//! Staging directory for materialized artifacts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};

/// Directory artifacts are written to before publishing.
///
/// A temporary directory created by the pipeline is removed on
/// [`StagingDir::close`] or drop. A caller-supplied directory is never removed.
#[derive(Debug)]
pub enum StagingDir {
    Owned(TempDir),
    Borrowed(PathBuf),
}

impl StagingDir {
    /// Create a fresh temporary directory owned by the pipeline.
    pub fn temporary() -> io::Result<Self> {
        tempfile::Builder::new()
            .prefix("dino-")
            .tempdir()
            .map(Self::Owned)
    }

    /// Use a caller-supplied directory, creating it if needed.
    pub fn existing(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self::Borrowed(path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Owned(dir) => dir.path(),
            Self::Borrowed(path) => path,
        }
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Write `contents` to `name`, replacing any existing file atomically.
    pub fn write(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let target = self.path().join(name);
        let mut file = NamedTempFile::new_in(self.path())?;
        file.write_all(contents)?;
        file.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }

    /// Release the directory, deleting it only if it is owned.
    pub fn close(self) -> io::Result<()> {
        match self {
            Self::Owned(dir) => dir.close(),
            Self::Borrowed(_) => Ok(()),
        }
    }
}
