use std::fs;
use std::path::{Path, PathBuf};

use crate::model::payload::PayloadError;
use crate::model::session::Session;

pub const SESSION_FILE: &str = ".tagdelta.json";

/// Error type for session file I/O
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no open session in {0} (run `td open` first)")]
    NoSession(PathBuf),
    #[error("a session is already open in {0} (use --force to discard it)")]
    AlreadyOpen(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corrupt session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid session payload: {0}")]
    Payload(#[from] PayloadError),
}

pub fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

pub fn session_exists(dir: &Path) -> bool {
    session_path(dir).exists()
}

/// Read .tagdelta.json from the directory
pub fn read_session(dir: &Path) -> Result<Session, SessionError> {
    let path = session_path(dir);
    if !path.exists() {
        return Err(SessionError::NoSession(dir.to_path_buf()));
    }
    let content = fs::read_to_string(&path).map_err(|e| SessionError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let session: Session =
        serde_json::from_str(&content).map_err(|e| SessionError::Corrupt { path, source: e })?;
    // Reject a payload that no longer matches its baseline
    session.state()?;
    Ok(session)
}

/// Write .tagdelta.json to the directory
pub fn write_session(dir: &Path, session: &Session) -> Result<(), SessionError> {
    let path = session_path(dir);
    let content = serde_json::to_string_pretty(session).map_err(|e| SessionError::Corrupt {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, content).map_err(|e| SessionError::WriteError { path, source: e })
}

/// Discard the session. A missing file is not an error.
pub fn remove_session(dir: &Path) -> Result<(), SessionError> {
    let path = session_path(dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SessionError::WriteError { path, source: e }),
    }
}
