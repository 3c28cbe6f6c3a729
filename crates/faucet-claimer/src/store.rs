//! Persistence of the claiming address in a small JSON record.

use crate::error::ClaimerResult;
use crate::json::decode_object;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of the record: `{"address": "<string>"}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct AddressRecord {
    #[serde(default)]
    address: Option<String>,
}

/// Reads and writes the single stored address
#[derive(Debug, Clone)]
pub struct AddressStore {
    path: PathBuf,
}

impl AddressStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored address.
    ///
    /// Returns `Ok(None)` when the record does not exist or holds no usable
    /// address. A record that is not valid JSON is an error.
    pub fn load(&self) -> ClaimerResult<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No address record at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let record: AddressRecord = decode_object(contents.as_bytes())?;
        Ok(record.address.filter(|address| !address.is_empty()))
    }

    /// Overwrite the record with `address`. Not atomic.
    pub fn save(&self, address: &str) -> ClaimerResult<()> {
        let record = AddressRecord {
            address: Some(address.to_string()),
        };
        std::fs::write(&self.path, serde_json::to_string(&record)?)?;
        debug!("Saved address record to {}", self.path.display());
        Ok(())
    }
}
