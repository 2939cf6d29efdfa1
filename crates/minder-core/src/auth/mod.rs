//! Registration and login.
//!
//! The authenticator is a two-mode state machine (`LoggingIn` and
//! `Registering`) over an injected [`CredentialStore`], so it can be tested
//! without a real database. Passwords never reach the store in plaintext;
//! they are hashed by the [`password`] module before insertion.

pub mod password;
pub mod store;

use std::fmt;

use tracing::info;

pub use store::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore, StoredUser};

/// Errors surfaced to the user by registration and login.
///
/// All of these are recoverable; none abort the session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username and password must not be empty")]
    EmptyField,

    #[error("username {0:?} is already taken")]
    DuplicateUser(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("credential store error: {0}")]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        Self::Store(e)
    }
}

/// Which form the auth screen is showing.
///
/// Switching modes is a pure UI-state transition with no effect on the
/// store. The initial mode is `LoggingIn`; a successful registration flips
/// back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    LoggingIn,
    Registering,
}

impl AuthMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::LoggingIn => Self::Registering,
            Self::Registering => Self::LoggingIn,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoggingIn => "logging_in",
            Self::Registering => "registering",
        };
        f.write_str(s)
    }
}

/// An authenticated user session, handed to the success callback and
/// returned from [`Authenticator::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

type SuccessCallback = Box<dyn FnOnce(&Session) + Send>;

/// Gates access to the task list: register/login over a credential store.
pub struct Authenticator<S: CredentialStore> {
    store: S,
    mode: AuthMode,
    on_success: Option<SuccessCallback>,
}

impl<S: CredentialStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            mode: AuthMode::default(),
            on_success: None,
        }
    }

    /// Register a callback invoked exactly once, on the first successful
    /// login. Later logins still succeed but do not re-invoke it.
    pub fn on_success(mut self, callback: impl FnOnce(&Session) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// The current screen mode.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switch between the login and registration forms. No store access.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Create a new account.
    ///
    /// Fails with [`AuthError::EmptyField`] when either input is blank and
    /// [`AuthError::DuplicateUser`] when the username is taken. On success
    /// the password hash is inserted and the mode flips back to
    /// `LoggingIn`.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyField);
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUser(username.to_owned()));
        }

        let hash = password::hash_password(password);
        self.store.insert(username, &hash).await?;
        info!(username, "user registered");

        self.mode = AuthMode::LoggingIn;
        Ok(())
    }

    /// Authenticate an existing account.
    ///
    /// An unknown username and a wrong password are indistinguishable to
    /// the caller: both yield [`AuthError::InvalidCredentials`].
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyField);
        }

        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user_id: user.id,
            username: user.username,
        };
        info!(username = %session.username, "login succeeded");

        if let Some(callback) = self.on_success.take() {
            callback(&session);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn authenticator() -> Authenticator<MemoryCredentialStore> {
        Authenticator::new(MemoryCredentialStore::default())
    }

    // -- mode machine --

    #[test]
    fn initial_mode_is_logging_in() {
        let auth = authenticator();
        assert_eq!(auth.mode(), AuthMode::LoggingIn);
    }

    #[test]
    fn toggle_mode_roundtrips() {
        let mut auth = authenticator();
        auth.toggle_mode();
        assert_eq!(auth.mode(), AuthMode::Registering);
        auth.toggle_mode();
        assert_eq!(auth.mode(), AuthMode::LoggingIn);
    }

    // -- register --

    #[tokio::test]
    async fn register_rejects_blank_fields() {
        let mut auth = authenticator();

        for (user, pass) in [("", "secret"), ("ada", ""), ("   ", "secret"), ("", "")] {
            let result = auth.register(user, pass).await;
            assert!(
                matches!(result, Err(AuthError::EmptyField)),
                "({user:?}, {pass:?}) should be EmptyField"
            );
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let mut auth = authenticator();

        auth.register("ada", "secret").await.unwrap();
        let result = auth.register("ada", "other").await;
        assert!(matches!(result, Err(AuthError::DuplicateUser(name)) if name == "ada"));
    }

    #[tokio::test]
    async fn register_flips_mode_back_to_login() {
        let mut auth = authenticator();
        auth.toggle_mode();
        assert_eq!(auth.mode(), AuthMode::Registering);

        auth.register("ada", "secret").await.unwrap();
        assert_eq!(auth.mode(), AuthMode::LoggingIn);
    }

    #[tokio::test]
    async fn register_never_stores_plaintext() {
        let store = MemoryCredentialStore::default();
        let mut auth = Authenticator::new(store.clone());

        auth.register("ada", "hunter2").await.unwrap();

        let stored = store.find_by_username("ada").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter2");
        assert!(stored.password_hash.starts_with("pbkdf2-sha256$"));
    }

    // -- login --

    #[tokio::test]
    async fn login_with_unknown_user_is_invalid_credentials() {
        let mut auth = authenticator();
        let result = auth.login("nobody", "whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let mut auth = authenticator();
        auth.register("ada", "secret").await.unwrap();

        let result = auth.login("ada", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_blank_fields() {
        let mut auth = authenticator();
        auth.register("ada", "secret").await.unwrap();

        let result = auth.login("", "secret").await;
        assert!(matches!(result, Err(AuthError::EmptyField)));
        let result = auth.login("ada", "").await;
        assert!(matches!(result, Err(AuthError::EmptyField)));
    }

    #[tokio::test]
    async fn login_returns_session_for_valid_credentials() {
        let mut auth = authenticator();
        auth.register("ada", "secret").await.unwrap();

        let session = auth.login("ada", "secret").await.unwrap();
        assert_eq!(session.username, "ada");
        assert!(session.user_id >= 1);
    }

    #[tokio::test]
    async fn success_callback_fires_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_cb = Arc::clone(&calls);

        let mut auth = Authenticator::new(MemoryCredentialStore::default()).on_success(
            move |session| {
                assert_eq!(session.username, "ada");
                calls_in_cb.fetch_add(1, Ordering::SeqCst);
            },
        );

        auth.register("ada", "secret").await.unwrap();

        // Failed attempts must not fire the callback.
        let _ = auth.login("ada", "wrong").await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        auth.login("ada", "secret").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A second successful login still works but the callback stays spent.
        auth.login("ada", "secret").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
