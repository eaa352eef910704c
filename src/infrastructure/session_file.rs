use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::ports::SessionStore;
use crate::domain::session::Session;

/// Keeps the session as one JSON record on disk.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("cannot read session file {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!(
                    "ignoring malformed session file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DomainError::Internal(e.to_string()))?;
        }
        let bytes =
            serde_json::to_vec_pretty(session).map_err(|e| DomainError::Internal(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(e.to_string())),
        }
    }
}
