//! Signed-value construction and password hashing.
//!
//! Everything a cookie needs to be trusted travels inside the cookie
//! itself: the value is `payload|signature` where the signature is an HMAC
//! over the payload under the process-wide signing key. Password hashes are
//! likewise self-describing (`salt,digest`), so verification never needs an
//! external salt store.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_SEPARATOR: char = '|';
const SALT_SEPARATOR: char = ',';
const SALT_LEN: usize = 8;

/// Process-wide cookie signing key. Initialized once at startup, read-only
/// afterwards. Rotating it invalidates every outstanding cookie.
#[derive(Debug, Clone)]
pub struct SigningKey(SecretString);

impl SigningKey {
    #[must_use]
    pub fn new(key: SecretString) -> Self {
        Self(key)
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(self.0.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"));
        mac.update(payload.as_bytes());
        mac
    }
}

/// Sign `raw` into a `payload|signature` token. Deterministic for a given
/// key, no side effects.
#[must_use]
pub fn make_secure_value(raw: &str, key: &SigningKey) -> String {
    let signature = key.mac(raw).finalize().into_bytes();
    format!(
        "{raw}{TOKEN_SEPARATOR}{}",
        Base64UrlUnpadded::encode_string(&signature)
    )
}

/// Verify a `payload|signature` token and return the payload.
///
/// Returns `None` for anything that does not verify: missing separator,
/// empty payload, bad base64, or a signature mismatch. Never panics on
/// attacker-controlled input.
#[must_use]
pub fn check_secure_value(token: &str, key: &SigningKey) -> Option<String> {
    // The signature never contains the separator, so splitting from the
    // right keeps payloads containing it intact
    let (payload, signature) = token.rsplit_once(TOKEN_SEPARATOR)?;

    if payload.is_empty() {
        return None;
    }

    let signature = Base64UrlUnpadded::decode_vec(signature).ok()?;

    // verify_slice is constant-time
    key.mac(payload).verify_slice(&signature).ok()?;

    Some(payload.to_string())
}

/// Hash a password into a self-describing `salt,digest` string.
///
/// When `salt` is `None` a fresh one is drawn; passing an explicit salt is
/// how verification recomputes the stored value.
#[must_use]
pub fn hash_password(username: &str, password: &str, salt: Option<&str>) -> String {
    let salt = salt.map_or_else(generate_salt, ToString::to_string);

    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();

    format!("{salt}{SALT_SEPARATOR}{}", hex::encode(digest))
}

/// Check a password against a stored `salt,digest` hash.
///
/// A malformed stored hash is a mismatch, not an error.
#[must_use]
pub fn verify_password(username: &str, password: &str, stored: &str) -> bool {
    let Some((salt, _)) = stored.split_once(SALT_SEPARATOR) else {
        return false;
    };

    let recomputed = hash_password(username, password, Some(salt));

    recomputed.as_bytes().ct_eq(stored.as_bytes()).into()
}

fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SigningKey {
        SigningKey::new(s.to_string().into())
    }

    #[test]
    fn secure_value_round_trip() {
        let k = key("imsosecret");
        for raw in ["42", "user-id", "a", "with|separator", "0190f5e8-..-anything"] {
            let token = check_secure_value(&make_secure_value(raw, &k), &k);
            assert_eq!(token.as_deref(), Some(raw));
        }
    }

    #[test]
    fn secure_value_is_deterministic() {
        let k = key("imsosecret");
        assert_eq!(make_secure_value("42", &k), make_secure_value("42", &k));
    }

    #[test]
    fn secure_value_rejects_wrong_key() {
        let token = make_secure_value("42", &key("key-one"));
        assert_eq!(check_secure_value(&token, &key("key-two")), None);
    }

    #[test]
    fn secure_value_rejects_tampered_payload() {
        let k = key("imsosecret");
        let token = make_secure_value("42", &k);
        let tampered = token.replacen("42", "43", 1);
        assert_eq!(check_secure_value(&tampered, &k), None);
    }

    #[test]
    fn secure_value_rejects_malformed_tokens() {
        let k = key("imsosecret");
        for bad in ["", "no-separator", "|sig-only", "payload|", "payload|@@@"] {
            assert_eq!(check_secure_value(bad, &k), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn password_round_trip() {
        let stored = hash_password("alice", "hunter2", None);
        assert!(verify_password("alice", "hunter2", &stored));
    }

    #[test]
    fn password_rejects_wrong_password() {
        let stored = hash_password("alice", "hunter2", None);
        assert!(!verify_password("alice", "hunter3", &stored));
    }

    #[test]
    fn password_hash_binds_username() {
        let stored = hash_password("alice", "hunter2", None);
        assert!(!verify_password("bob", "hunter2", &stored));
    }

    #[test]
    fn password_hash_is_self_describing() {
        let stored = hash_password("alice", "hunter2", None);
        let (salt, digest) = stored.split_once(',').expect("salt,digest format");
        assert_eq!(salt.len(), 8);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(digest.len(), 64);
        // Recomputing with the embedded salt reproduces the stored value
        assert_eq!(hash_password("alice", "hunter2", Some(salt)), stored);
    }

    #[test]
    fn password_rejects_malformed_stored_hash() {
        assert!(!verify_password("alice", "hunter2", "no-salt-separator"));
        assert!(!verify_password("alice", "hunter2", ""));
    }
}
