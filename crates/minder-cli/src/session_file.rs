//! Session token persistence for the CLI.
//!
//! The login command writes the minted token to `~/.config/minder/session`;
//! task commands read and validate it, and `minder logout` removes it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use minder_core::session::{SessionClaims, SessionConfig, validate_token};

use crate::config;

/// Return the path to the session token file.
pub fn session_path() -> PathBuf {
    config::config_dir().join("session")
}

/// Write the session token, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_session(token: &str) -> Result<()> {
    let dir = config::config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let path = session_path();
    std::fs::write(&path, token)
        .with_context(|| format!("failed to write session file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Remove the session token file. Missing files are fine.
pub fn clear_session() -> Result<bool> {
    let path = session_path();
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            Err(e).with_context(|| format!("failed to remove session file at {}", path.display()))
        }
    }
}

/// Read and validate the stored session token.
///
/// Errors when no session file exists or the token does not verify; task
/// commands use this as their login gate.
pub fn require_session(session_config: &SessionConfig) -> Result<SessionClaims> {
    let path = session_path();
    let token = std::fs::read_to_string(&path)
        .map_err(|_| anyhow::anyhow!("not logged in; run `minder login <username>` first"))?;

    let claims = validate_token(session_config, token.trim())
        .context("stored session token is invalid; run `minder login` again")?;
    Ok(claims)
}
