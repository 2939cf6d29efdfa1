//! Session token generation and validation.
//!
//! A token is minted on successful login so task commands in later process
//! invocations stay behind the login gate. Tokens are HMAC-SHA256 based,
//! scoped to a (user_id, session_id) pair.
//! Format: `minder_st_<user_id>_<session_uuid>_<hmac_hex>`

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Token prefix used to identify minder session tokens.
const TOKEN_PREFIX: &str = "minder_st_";

/// Errors that can occur during session token operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    #[error("invalid user ID in token: {0}")]
    InvalidUserId(String),

    #[error("invalid session ID in token: {0}")]
    InvalidSessionId(String),

    #[error("token HMAC verification failed")]
    HmacMismatch,

    #[error("missing token secret")]
    MissingSecret,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The HMAC secret key bytes.
    pub secret: Vec<u8>,
}

impl SessionConfig {
    /// Create a new SessionConfig with the given secret.
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Create a SessionConfig from the `MINDER_TOKEN_SECRET` environment
    /// variable (hex-encoded, as written by `minder init`).
    pub fn from_env() -> Result<Self, SessionError> {
        let secret_hex =
            std::env::var("MINDER_TOKEN_SECRET").map_err(|_| SessionError::MissingSecret)?;
        let secret = hex::decode(&secret_hex).map_err(|e| {
            SessionError::InvalidFormat(format!("MINDER_TOKEN_SECRET is not valid hex: {e}"))
        })?;
        Ok(Self::new(secret))
    }
}

/// Claims extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// The user this session belongs to.
    pub user_id: i64,
    /// Unique identifier for this login session.
    pub session_id: Uuid,
}

/// Mint a session token for a user, with a fresh session id.
pub fn mint_token(config: &SessionConfig, user_id: i64) -> String {
    generate_token(config, user_id, Uuid::new_v4())
}

/// Generate a session token for a given user and session id.
///
/// The token format is: `minder_st_<user_id>_<session_uuid>_<hmac_hex>`
/// where the HMAC-SHA256 is computed over `<user_id>:<session_uuid>`.
pub fn generate_token(config: &SessionConfig, user_id: i64, session_id: Uuid) -> String {
    let message = format!("{user_id}:{session_id}");
    let mac = compute_hmac(&config.secret, message.as_bytes());
    let hmac_hex = hex::encode(mac);
    format!("{TOKEN_PREFIX}{user_id}_{session_id}_{hmac_hex}")
}

/// Validate a session token and extract its claims.
///
/// Parses the token format, recomputes the HMAC, and verifies it with a
/// constant-time comparison before returning the claims.
pub fn validate_token(config: &SessionConfig, token: &str) -> Result<SessionClaims, SessionError> {
    let rest = token.strip_prefix(TOKEN_PREFIX).ok_or_else(|| {
        SessionError::InvalidFormat("token must start with 'minder_st_'".to_string())
    })?;

    // Components: <user_id>_<session_uuid>_<hmac_hex>
    let (user_id_str, after_user_id) = rest.split_once('_').ok_or_else(|| {
        SessionError::InvalidFormat("expected underscore after user_id".to_string())
    })?;

    let user_id: i64 = user_id_str
        .parse()
        .map_err(|e: std::num::ParseIntError| SessionError::InvalidUserId(e.to_string()))?;

    let (session_id_str, hmac_hex) = after_user_id.split_once('_').ok_or_else(|| {
        SessionError::InvalidFormat("expected underscore between session_id and hmac".to_string())
    })?;

    let session_id = Uuid::parse_str(session_id_str)
        .map_err(|e| SessionError::InvalidSessionId(e.to_string()))?;

    let provided_mac = hex::decode(hmac_hex)
        .map_err(|e| SessionError::InvalidFormat(format!("invalid hex in hmac: {e}")))?;

    let message = format!("{user_id}:{session_id}");
    verify_hmac_constant_time(&config.secret, message.as_bytes(), &provided_mac)?;

    Ok(SessionClaims {
        user_id,
        session_id,
    })
}

/// Compute HMAC-SHA256 over the given message with the given key.
fn compute_hmac(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Verify HMAC using the `hmac` crate's constant-time `verify_slice`.
fn verify_hmac_constant_time(
    key: &[u8],
    message: &[u8],
    expected_mac: &[u8],
) -> Result<(), SessionError> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.verify_slice(expected_mac)
        .map_err(|_| SessionError::HmacMismatch)
}
