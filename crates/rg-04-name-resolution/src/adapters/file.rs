use std::fs;
use std::path::{Path, PathBuf};

use shared_types::fs::write_atomic;

use crate::domain::NameDocument;
use crate::error::NameError;
use crate::ports::NameDocumentStore;

/// File name used under the relay working directory.
pub const NAME_FILE_NAME: &str = "nip05.json";

/// `nip05.json` on disk. A missing file reads as an empty document.
pub struct JsonNameFile {
    path: PathBuf,
}

impl JsonNameFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(work_dir: P) -> Self {
        Self::new(work_dir.as_ref().join(NAME_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> NameError {
        NameError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl NameDocumentStore for JsonNameFile {
    fn load(&self) -> Result<NameDocument, NameError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(NameDocument::default())
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| NameError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, document: &NameDocument) -> Result<(), NameError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(NameError::Encode)?;
        write_atomic(&self.path, &bytes).map_err(|e| self.io_error(e))
    }
}
