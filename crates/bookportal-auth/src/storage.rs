//! Persistence backends for the session.
//!
//! The principal and the credential are stored as one document so a single
//! write either lands both or neither.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bookportal_core::Session;
use tempfile::NamedTempFile;

use crate::error::{SessionError, SessionResult};

/// Where the session survives between runs.
///
/// Implementations must make `save` and `clear` atomic per call: after either
/// returns, `load` sees the complete old or the complete new document.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session. `Ok(None)` when nothing is stored.
    ///
    /// Returns [`SessionError::Malformed`] when a document exists but cannot
    /// be parsed.
    fn load(&self) -> SessionResult<Option<Session>>;

    /// Persist principal and credential together.
    fn save(&self, session: &Session) -> SessionResult<()>;

    /// Remove the persisted session. Succeeds when nothing was stored.
    fn clear(&self) -> SessionResult<()>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<T> {
    fn load(&self) -> SessionResult<Option<Session>> {
        (**self).load()
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        (**self).save(session)
    }

    fn clear(&self) -> SessionResult<()> {
        (**self).clear()
    }
}

fn decode(raw: &str) -> SessionResult<Session> {
    let session: Session =
        serde_json::from_str(raw).map_err(|e| SessionError::malformed(e.to_string()))?;
    if session.credential.token().trim().is_empty() {
        return Err(SessionError::malformed("credential is empty"));
    }
    Ok(session)
}

fn encode(session: &Session) -> SessionResult<String> {
    serde_json::to_string_pretty(session).map_err(|e| SessionError::storage(e.to_string()))
}

/// In-memory storage for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an arbitrary persisted document, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn with_session(session: &Session) -> SessionResult<Self> {
        Ok(Self::with_raw(encode(session)?))
    }

    /// Raw persisted document, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|guard| guard.clone())
    }

    fn slot(&self) -> SessionResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.raw
            .lock()
            .map_err(|_| SessionError::storage("session storage lock poisoned"))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> SessionResult<Option<Session>> {
        match self.slot()?.as_deref() {
            Some(raw) => decode(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        let encoded = encode(session)?;
        *self.slot()? = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// JSON file on disk, one file per profile.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.bookportal/session.<profile>.json`
    pub fn for_profile(profile: &str) -> SessionResult<Self> {
        let dir = dirs::home_dir()
            .ok_or(SessionError::NoHomeDirectory)?
            .join(".bookportal");
        Ok(Self::new(dir.join(format!("session.{profile}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> SessionResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        decode(&content).map(Some)
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;
        let content = encode(session)?;
        // unique name next to the target so concurrent saves never share it
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        restrict_permissions(tmp.path())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> SessionResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> SessionResult<()> {
    Ok(())
}
