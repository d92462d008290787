//! On-disk store of delivered offer letters, one directory per offer id.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::generators::Artifact;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to store artifact: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist `artifact` as `<root>/<offer_id>/<filename>`.
    pub fn save(&self, offer_id: &str, artifact: &Artifact) -> Result<PathBuf, StorageError> {
        let dir = self.root.join(offer_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join(&artifact.filename);
        fs::write(&path, &artifact.bytes)?;
        Ok(path)
    }

    /// Delete everything stored for `offer_id`.
    pub fn remove(&self, offer_id: &str) -> Result<(), StorageError> {
        let dir = self.root.join(offer_id);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    /// Locate the stored artifact of `offer_id`.
    ///
    /// Callers must pass a validated id; the value is used as a path segment.
    pub fn find(&self, offer_id: &str) -> Option<PathBuf> {
        let entries = fs::read_dir(self.root.join(offer_id)).ok()?;
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| path.is_file())
    }
}
