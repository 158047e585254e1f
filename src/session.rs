//! Persisted login session.
//!
//! Identification only: the backend has no token scheme, so the session is
//! just the user record we looked up at login. The password is never
//! written to disk.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Role, User};

const SESSION_FILE: &str = "session.json";

/// The subset of the user record worth keeping between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub name: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Session {
            user_id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    /// Display label, mirroring [`User::label`].
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    /// Rebuild a `User` for permission checks and filter construction.
    pub fn to_user(&self) -> User {
        User {
            id: self.user_id,
            username: self.username.clone(),
            name: self.name.clone(),
            role: self.role,
            phone: None,
        }
    }
}

fn session_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPRINTDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("sprintdeck"))
}

fn session_path() -> Result<PathBuf> {
    Ok(session_dir()?.join(SESSION_FILE))
}

/// Load the stored session, or `None` when nobody is logged in.
pub fn load() -> Result<Option<Session>> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    let session = serde_json::from_str(&raw)
        .with_context(|| format!("Corrupt session file: {}", path.display()))?;
    Ok(Some(session))
}

/// Persist the session, creating the config directory if needed.
pub fn save(session: &Session) -> Result<()> {
    let dir = session_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    let path = dir.join(SESSION_FILE);
    let raw = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
    fs::write(&path, raw)
        .with_context(|| format!("Failed to write session file: {}", path.display()))?;
    Ok(())
}

/// Remove the stored session. Succeeds when none exists.
pub fn clear() -> Result<()> {
    let path = session_path()?;
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 9,
            username: "ana".into(),
            name: Some("Ana Ruiz".into()),
            role: Role::Manager,
            phone: None,
        }
    }

    #[test]
    fn test_session_round_trip_in_isolated_dir() {
        let dir = tempfile::tempdir().unwrap();
        // Env vars are process-global; this test owns the variable for
        // its duration because the suite sets it nowhere else.
        unsafe { std::env::set_var("SPRINTDECK_CONFIG_DIR", dir.path()) };

        assert!(load().unwrap().is_none());

        let session = Session::for_user(&sample_user());
        save(&session).unwrap();

        let loaded = load().unwrap().expect("session should exist after save");
        assert_eq!(loaded.user_id, 9);
        assert_eq!(loaded.username, "ana");
        assert_eq!(loaded.role, Role::Manager);
        assert_eq!(loaded.label(), "Ana Ruiz");

        clear().unwrap();
        assert!(load().unwrap().is_none());
        // Clearing twice is fine.
        clear().unwrap();

        unsafe { std::env::remove_var("SPRINTDECK_CONFIG_DIR") };
    }

    #[test]
    fn test_session_never_stores_a_password() {
        let raw = serde_json::to_string(&Session::for_user(&sample_user())).unwrap();
        assert!(!raw.to_lowercase().contains("password"));
    }

    #[test]
    fn test_to_user_round_trips_identity() {
        let user = sample_user();
        let back = Session::for_user(&user).to_user();
        assert_eq!(back.id, user.id);
        assert_eq!(back.role, user.role);
        assert_eq!(back.label(), "Ana Ruiz");
    }
}
