use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;

/// Static shared-secret credentials. The bearer token is not minted per
/// session: it is always `base64(user + password)`.
#[derive(Clone)]
pub struct SharedSecret {
    user: String,
    password: String,
    token: String,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret").field("user", &self.user).finish_non_exhaustive()
    }
}

impl SharedSecret {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        let user = user.into();
        let password = password.into();
        let token = derive_token(&user, &password);
        Self { user, password, token }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.user.clone(), config.password.clone())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Login check: both values must be present and match
    pub fn check_credentials(&self, user: Option<&str>, password: Option<&str>) -> bool {
        match (user, password) {
            (Some(u), Some(p)) => {
                // Evaluate both so a wrong user costs the same as a wrong password
                let user_ok = constant_time_eq(u.as_bytes(), self.user.as_bytes());
                let password_ok = constant_time_eq(p.as_bytes(), self.password.as_bytes());
                user_ok & password_ok
            }
            _ => false,
        }
    }

    /// Authorization header check: must equal the token exactly
    pub fn verify(&self, header: Option<&str>) -> bool {
        header.map_or(false, |h| constant_time_eq(h.as_bytes(), self.token.as_bytes()))
    }
}

pub fn derive_token(user: &str, password: &str) -> String {
    STANDARD.encode(format!("{}{}", user, password))
}

/// Compare fixed-length digests without short-circuiting, so neither the
/// length nor the first differing byte of the input leaks through timing
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let da = Sha256::digest(a);
    let db = Sha256::digest(b);
    da.iter().zip(db.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
