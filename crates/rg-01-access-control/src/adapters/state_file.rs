//! JSON file persistence for the access-control state.

use std::fs;
use std::path::{Path, PathBuf};

use shared_types::fs::write_atomic;
use tracing::info;

use crate::domain::AccessControlState;
use crate::error::StateFileError;
use crate::ports::StatePersistence;

/// File name used under the relay working directory.
pub const STATE_FILE_NAME: &str = "management.json";

/// Persists the whole aggregate as pretty JSON.
///
/// Writes go to a sibling temp file that is synced and then renamed over the
/// target, so a crash never leaves a half-written file behind.
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `management.json` under the given working directory.
    pub fn in_dir<P: AsRef<Path>>(work_dir: P) -> Self {
        Self::new(work_dir.as_ref().join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StateFileError {
        StateFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StatePersistence for JsonStateFile {
    fn load(&self) -> Result<Option<AccessControlState>, StateFileError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[rg-01] No state file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let state: AccessControlState =
            serde_json::from_slice(&bytes).map_err(|source| StateFileError::Decode {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "[rg-01] Loaded state from {} ({} bytes, {} admins)",
            self.path.display(),
            bytes.len(),
            state.admins.len()
        );
        Ok(Some(state))
    }

    fn save(&self, state: &AccessControlState) -> Result<(), StateFileError> {
        let bytes = serde_json::to_vec_pretty(state).map_err(StateFileError::Encode)?;
        write_atomic(&self.path, &bytes).map_err(|e| self.io_error(e))
    }
}
