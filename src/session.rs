use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils;

/// Credentials kept between runs: the bearer token and who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid json: {0}")]
    Format(#[from] serde_json::Error),
}

/// Process-wide session context. Loaded once at startup, cleared on logout
/// or when the backend rejects the token.
pub struct SessionStore {
    path: PathBuf,
    data: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Read the stored session, if any. A missing or unreadable file means
    /// signed out.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read_session(&path) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring stored session");
                None
            }
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn load_default() -> Self {
        Self::load(utils::default_session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Writes swap the whole value, so a guard poisoned by a panicking
    // holder still holds a consistent session.
    fn guard(&self) -> MutexGuard<'_, Option<Session>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<Session> {
        self.guard().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    pub fn store(&self, session: Session) -> Result<(), SessionError> {
        let mut guard = self.guard();
        write_session(&self.path, &session)?;
        *guard = Some(session);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.guard();
        *guard = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_session(path: &Path) -> Result<Option<Session>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let session: Session = serde_json::from_str(&contents)?;
    if session.token.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(session))
}

fn write_session(path: &Path, session: &Session) -> Result<(), SessionError> {
    utils::ensure_parent(path)?;
    let contents = serde_json::to_string_pretty(session)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            token: "abc.def".to_string(),
            username: "dina".to_string(),
        }
    }

    #[test]
    fn survives_reload() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::load(&path);
        assert!(!store.is_signed_in());
        store.store(session()).expect("store session");

        let reloaded = SessionStore::load(&path);
        assert_eq!(reloaded.current(), Some(session()));
        assert_eq!(reloaded.token().as_deref(), Some("abc.def"));
    }

    #[test]
    fn clear_removes_file_and_memory() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");

        let store = SessionStore::load(&path);
        store.store(session()).expect("store session");
        store.clear().expect("clear session");

        assert!(!store.is_signed_in());
        assert!(!path.exists());
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write junk");

        assert!(SessionStore::load(&path).current().is_none());
    }

    #[test]
    fn poisoned_lock_keeps_reads_and_writes_consistent() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");
        let store = SessionStore::load(&path);
        store.store(session()).expect("store session");

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = store.data.lock().expect("first lock");
            panic!("holder panicked");
        }));
        assert!(poisoned.is_err());
        assert!(store.data.is_poisoned());

        assert_eq!(store.current(), Some(session()));
        store.clear().expect("clear after poison");
        assert!(!store.is_signed_in());
        assert!(!path.exists());
    }
}
