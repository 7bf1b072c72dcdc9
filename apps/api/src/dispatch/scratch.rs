//! Per-request scratch directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

/// A uniquely named directory that is removed when the guard drops.
///
/// The response body stream owns the guard, so the directory outlives the
/// handler and disappears once the last chunk has been read or the client
/// has gone away.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("render-{}-", Uuid::new_v4()))
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        debug!("Created scratch directory {}", path.display());
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!("Removed scratch directory {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove scratch directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
