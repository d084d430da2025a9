use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Scratch input/output files for one protect request.
///
/// Both paths share a fresh random id so concurrent requests never collide.
/// Dropping the pair removes whichever files exist.
#[derive(Debug)]
pub struct TempFilePair {
    id: Uuid,
    input: PathBuf,
    output: PathBuf,
}

impl TempFilePair {
    pub fn new(dir: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            input: dir.join(format!("input_{}.pdf", id)),
            output: dir.join(format!("output_{}.pdf", id)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Drop for TempFilePair {
    fn drop(&mut self) {
        for path in [&self.input, &self.output] {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!("Removed temp file: {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Error cleaning up temp file {}: {}", path.display(), e)
                }
            }
        }
    }
}
