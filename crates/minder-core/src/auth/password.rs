//! Salted password hashing.
//!
//! PBKDF2-HMAC-SHA256 with a random 16-byte salt, encoded as
//! `pbkdf2-sha256$<iterations>$<salt_hex>$<hash_hex>`. Verification
//! recomputes the hash and compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Iteration count for newly created hashes. Stored in the encoding, so it
/// can be raised later without invalidating existing records.
pub const DEFAULT_ITERATIONS: u32 = 50_000;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, DEFAULT_ITERATIONS)
}

fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    use rand::Rng;
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);

    let hash = pbkdf2_sha256(password.as_bytes(), &salt, iterations);
    format!(
        "{ALGORITHM}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check a password against a stored encoding.
///
/// Returns `false` for wrong passwords and for malformed or unrecognized
/// encodings; callers treat all of those as invalid credentials.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some((iterations, salt, expected)) = parse_encoding(encoded) else {
        return false;
    };

    let actual = pbkdf2_sha256(password.as_bytes(), &salt, iterations);
    constant_time_eq(&actual, &expected)
}

fn parse_encoding(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != ALGORITHM {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || iterations == 0 || hash.len() != HASH_LEN {
        return None;
    }
    Some((iterations, salt, hash))
}

/// PBKDF2 with HMAC-SHA256, single output block (32 bytes).
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut mac =
        HmacSha256::new_from_slice(password).expect("HMAC can take key of any size");
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut u: [u8; HASH_LEN] = mac.finalize().into_bytes().into();

    let mut result = u;
    for _ in 1..iterations {
        let mut mac =
            HmacSha256::new_from_slice(password).expect("HMAC can take key of any size");
        mac.update(&u);
        u = mac.finalize().into_bytes().into();
        for (r, b) in result.iter_mut().zip(u.iter()) {
            *r ^= b;
        }
    }
    result
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full-strength PBKDF2 is deliberately slow; tests use a low count.
    const TEST_ITERATIONS: u32 = 32;

    #[test]
    fn roundtrip_accepts_correct_password() {
        let encoded = hash_password_with_iterations("hunter2", TEST_ITERATIONS);
        assert!(verify_password("hunter2", &encoded));
    }

    #[test]
    fn wrong_password_rejected() {
        let encoded = hash_password_with_iterations("hunter2", TEST_ITERATIONS);
        assert!(!verify_password("hunter3", &encoded));
        assert!(!verify_password("", &encoded));
        assert!(!verify_password("Hunter2", &encoded));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password_with_iterations("hunter2", TEST_ITERATIONS);
        let b = hash_password_with_iterations("hunter2", TEST_ITERATIONS);
        assert_ne!(a, b, "two hashes of the same password must differ");
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
    }

    #[test]
    fn encoding_has_expected_shape() {
        let encoded = hash_password_with_iterations("hunter2", TEST_ITERATIONS);
        let parts: Vec<&str> = encoded.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "pbkdf2-sha256");
        assert_eq!(parts[1], TEST_ITERATIONS.to_string());
        assert_eq!(parts[2].len(), SALT_LEN * 2);
        assert_eq!(parts[3].len(), HASH_LEN * 2);
    }

    #[test]
    fn malformed_encodings_rejected() {
        for bad in [
            "",
            "hunter2",
            "pbkdf2-sha256",
            "pbkdf2-sha256$abc$00$00",
            "pbkdf2-sha256$0$00$00",
            "pbkdf2-sha256$32$zz$ff",
            "pbkdf2-sha256$32$00$short",
            "md5$32$00$ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ] {
            assert!(
                !verify_password("hunter2", bad),
                "encoding {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn iteration_count_changes_hash() {
        // Same password, same comparison path, different work factors.
        let a = hash_password_with_iterations("pw", 16);
        assert!(verify_password("pw", &a));
        assert!(!verify_password("pw2", &a));
    }
}
