//! The `register`, `login`, and `logout` commands.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use minder_core::auth::{Authenticator, SqliteCredentialStore};
use minder_core::session::{SessionConfig, mint_token};

use crate::session_file;

/// Resolve the password: `--password` flag, then the `MINDER_PASSWORD`
/// env var, then an interactive prompt.
pub fn resolve_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("MINDER_PASSWORD") {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Execute `minder register`: create an account.
pub async fn run_register(pool: &SqlitePool, username: &str, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;

    let mut auth = Authenticator::new(SqliteCredentialStore::new(pool.clone()));
    auth.register(username, &password).await?;

    println!("Account {username:?} created. Log in with `minder login {username}`.");
    Ok(())
}

/// Execute `minder login`: authenticate and store a session token.
pub async fn run_login(
    pool: &SqlitePool,
    session_config: &SessionConfig,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;

    let mut auth = Authenticator::new(SqliteCredentialStore::new(pool.clone()))
        .on_success(|session| println!("Logged in as {}.", session.username));
    let session = auth.login(username, &password).await?;

    let token = mint_token(session_config, session.user_id);
    session_file::save_session(&token)?;

    Ok(())
}

/// Execute `minder logout`: remove the stored session token.
pub fn run_logout() -> Result<()> {
    if session_file::clear_session()? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}
