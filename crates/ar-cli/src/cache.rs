//! On-disk download cache.
//!
//! Fetched sources are stored as `source_<index>.txt` and read back in source
//! order. The directory is removed when the guard is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::AppError;
use crate::fetcher::FetchedSource;

pub struct CacheDir {
    path: PathBuf,
}

impl CacheDir {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|source| AppError::CacheCreate {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_for(&self, index: usize) -> PathBuf {
        self.path.join(format!("source_{index}.txt"))
    }

    pub fn store(&self, source: &FetchedSource) -> Result<PathBuf, AppError> {
        let file = self.file_for(source.index);
        fs::write(&file, &source.body).map_err(|e| AppError::CacheWrite {
            path: file.clone(),
            source: e,
        })?;
        debug!("cached {} as {}", source.url, file.display());
        Ok(file)
    }

    /// Store every source and return the cached paths in source order.
    /// Sources that cannot be cached are logged and skipped.
    pub fn store_all(&self, sources: &[FetchedSource]) -> Vec<PathBuf> {
        sources
            .iter()
            .filter_map(|source| match self.store(source) {
                Ok(file) => Some(file),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            })
            .collect()
    }
}

impl Drop for CacheDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("removed cache directory {}", self.path.display()),
            Err(e) => warn!("failed to remove cache directory {}: {e}", self.path.display()),
        }
    }
}

/// Read a cached document, replacing invalid UTF-8.
pub fn read_document(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
