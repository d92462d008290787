//! Per-request scratch directory.
//!
//! All intermediate files of one submission (QR image, rendered HTML,
//! converter output) live under a directory named after the offer id, so
//! concurrent submissions never share a path. The directory is removed when
//! the workspace is dropped, on success and failure alike.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::GeneratorError;

#[derive(Debug)]
pub struct RequestWorkspace {
    offer_id: String,
    dir: TempDir,
}

impl RequestWorkspace {
    /// Create a workspace in the system temp directory.
    pub fn create(offer_id: &str) -> Result<Self, GeneratorError> {
        Self::create_in(std::env::temp_dir(), offer_id)
    }

    pub fn create_in(parent: impl AsRef<Path>, offer_id: &str) -> Result<Self, GeneratorError> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("offer-{}-", offer_id))
            .tempdir_in(parent)
            .map_err(GeneratorError::Workspace)?;
        Ok(Self {
            offer_id: offer_id.to_string(),
            dir,
        })
    }

    pub fn offer_id(&self) -> &str {
        &self.offer_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn qr_path(&self) -> PathBuf {
        self.file(&format!("qr-{}.png", self.offer_id))
    }

    pub fn document_path(&self) -> PathBuf {
        self.file(&format!("offer-{}.html", self.offer_id))
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
