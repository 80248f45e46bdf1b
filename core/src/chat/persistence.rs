// Session persistence module
// Handles saving and loading chat sessions to/from files

use super::models::ChatSession;
use super::store::SessionStore;
use crate::error::PersistenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Current archive format version
const ARCHIVE_VERSION: u32 = 1;

/// Serializable structure for the session archive
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionArchiveData {
    /// Version of the archive format (for future migration support)
    version: u32,
    /// Sessions in creation order
    sessions: Vec<ChatSession>,
}

/// Session archive persistence operations
pub struct SessionArchive;

impl SessionArchive {
    /// Save every session in `store` to a JSON file
    ///
    /// Parent directories are created as needed. The active selection is not
    /// saved.
    pub fn save_to_file<P: AsRef<Path>>(
        store: &SessionStore,
        path: P,
    ) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let data = SessionArchiveData {
            version: ARCHIVE_VERSION,
            sessions: store.snapshot(),
        };

        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| PersistenceError::Json(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::Io(e.to_string()))?;
        }
        fs::write(path, json).map_err(|e| PersistenceError::Io(e.to_string()))?;

        debug!(path = %path.display(), sessions = data.sessions.len(), "Saved session archive");
        Ok(())
    }

    /// Load sessions from a JSON file
    ///
    /// A missing file yields an empty store. No session is active afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SessionStore, PersistenceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(SessionStore::new());
        }

        let json = fs::read_to_string(path).map_err(|e| PersistenceError::Io(e.to_string()))?;

        let data: SessionArchiveData =
            serde_json::from_str(&json).map_err(|e| PersistenceError::Json(e.to_string()))?;

        if data.version != ARCHIVE_VERSION {
            return Err(PersistenceError::InvalidData(format!(
                "Unsupported archive version: {}",
                data.version
            )));
        }

        info!(path = %path.display(), sessions = data.sessions.len(), "Loaded session archive");
        Ok(SessionStore::from_sessions(data.sessions))
    }
}
