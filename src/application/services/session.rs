//! Session token signing and verification.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies stateless session tokens.
///
/// A token is `base64url(customer_id ":" expiry_unix) "." hex(hmac_sha256)`,
/// keyed by the server-side signing secret. Nothing is stored; possession of
/// a token with a valid tag and unexpired timestamp is the session.
#[derive(Clone)]
pub struct SessionSigner {
    signing_secret: String,
    ttl: Duration,
}

impl SessionSigner {
    /// Creates a signer.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; rotating it invalidates all sessions
    /// - `ttl` - lifetime applied to newly issued tokens
    pub fn new(signing_secret: String, ttl: Duration) -> Self {
        Self {
            signing_secret,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `customer_id` expiring `ttl` from now.
    pub fn issue(&self, customer_id: i64) -> String {
        self.issue_at(customer_id, chrono::Utc::now().timestamp())
    }

    /// Issues a token against an explicit clock reading (unix seconds).
    pub fn issue_at(&self, customer_id: i64, now: i64) -> String {
        let expires_at = now + self.ttl.as_secs() as i64;
        let payload = URL_SAFE_NO_PAD.encode(format!("{customer_id}:{expires_at}"));
        let tag = self.sign(&payload);
        format!("{payload}.{tag}")
    }

    /// Verifies a token and returns the customer id it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for malformed tokens, bad
    /// signatures, and expired sessions.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verifies a token against an explicit clock reading (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<i64, AppError> {
        let (payload, tag) = token.split_once('.').ok_or_else(invalid_session)?;

        let tag_bytes = hex::decode(tag).map_err(|_| invalid_session())?;
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag_bytes)
            .map_err(|_| invalid_session())?;

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| invalid_session())?;
        let decoded = String::from_utf8(decoded).map_err(|_| invalid_session())?;

        let (id, expires_at) = decoded.split_once(':').ok_or_else(invalid_session)?;
        let id: i64 = id.parse().map_err(|_| invalid_session())?;
        let expires_at: i64 = expires_at.parse().map_err(|_| invalid_session())?;

        if expires_at <= now {
            return Err(AppError::unauthorized(
                "Not authorized to access this route",
                json!({ "reason": "session expired" }),
            ));
        }

        Ok(id)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn invalid_session() -> AppError {
    AppError::unauthorized(
        "Not authorized to access this route",
        json!({ "reason": "invalid session token" }),
    )
}
