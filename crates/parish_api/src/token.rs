//! Token-based authentication.
//!
//! Tokens are HMAC-SHA256 signed and carry their own expiry:
//!
//! - payload: `"{user_id}|{role}|{expires_millis}"`
//! - transport form: `hex(payload) "." hex(signature)`
//!
//! Verification checks the signature before trusting any payload
//! field, then the expiry.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use hmac::{Hmac, Mac};
use parish_core::model::{User, UserRole};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    /// Creates a signer with the default eight-hour token lifetime.
    #[must_use]
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            ttl: Duration::from_secs(8 * 60 * 60),
        }
    }

    /// Sets the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issues a token for a user account.
    #[must_use]
    pub fn issue(&self, user: &User) -> String {
        let expires = now_millis() + self.ttl.as_millis() as u64;
        let payload = format!("{}|{}|{}", user.meta.id, user.role, expires);
        let signature = self.sign(payload.as_bytes());
        format!("{}.{}", hex::encode(payload), hex::encode(signature))
    }

    /// Verifies a token and extracts the caller's context.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for malformed tokens, bad
    /// signatures, and expired tokens.
    pub fn verify(&self, token: &str) -> ApiResult<RequestContext> {
        let Some((payload_hex, signature_hex)) = token.split_once('.') else {
            return Err(ApiError::Authentication("malformed token".into()));
        };
        let payload = hex::decode(payload_hex)
            .map_err(|_| ApiError::Authentication("malformed token".into()))?;
        let signature = hex::decode(signature_hex)
            .map_err(|_| ApiError::Authentication("malformed token".into()))?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| ApiError::Authentication("invalid signature".into()))?;

        // Signature checked; the payload fields can be trusted now.
        let payload = String::from_utf8(payload)
            .map_err(|_| ApiError::Authentication("malformed token".into()))?;
        let parts: Vec<&str> = payload.split('|').collect();
        let [user_id, role, expires] = parts.as_slice() else {
            return Err(ApiError::Authentication("malformed token".into()));
        };

        let expires: u64 = expires
            .parse()
            .map_err(|_| ApiError::Authentication("malformed token".into()))?;
        if now_millis() > expires {
            return Err(ApiError::Authentication("token expired".into()));
        }
        let role: UserRole = role
            .parse()
            .map_err(|_| ApiError::Authentication("malformed token".into()))?;

        Ok(RequestContext::new(*user_id, role))
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
