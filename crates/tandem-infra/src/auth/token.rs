//! HS256 JWT session tokens.
//!
//! Implements both core token traits: `TokenIssuer` for login and
//! `TokenVerifier` for connection authentication. Verification is a pure
//! function of the token, the shared secret, and the wall clock; malformed
//! tokens, wrong-key signatures, and expired tokens all verify to `None`
//! without distinguishing why.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use tandem_core::identity::{TokenIssuer, TokenVerifier};
use tandem_types::UserId;
use tandem_types::error::AuthError;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id, stringified.
    sub: String,
    /// Expiry as a unix timestamp.
    exp: usize,
}

/// Issues and verifies HS256 session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Build a token service from the shared secret and a lifetime in minutes.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenIssueFailed)
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Option<UserId> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).ok()?;
        data.claims.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let service = JwtTokenService::new("secret", 60);
        let token = service.issue(42).unwrap();
        assert_eq!(service.verify(&token), Some(42));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let service = JwtTokenService::new("secret", 60);
        assert_eq!(service.verify(""), None);
        assert_eq!(service.verify("not.a.jwt"), None);
        assert_eq!(service.verify("a.b"), None);
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let issuer = JwtTokenService::new("secret-a", 60);
        let verifier = JwtTokenService::new("secret-b", 60);

        let token = issuer.issue(42).unwrap();
        assert_eq!(verifier.verify(&token), None);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // TTL well in the past, beyond the default validation leeway.
        let service = JwtTokenService::new("secret", -5);
        let token = service.issue(42).unwrap();
        assert_eq!(service.verify(&token), None);
    }
}
