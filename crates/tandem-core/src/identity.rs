//! Session token traits.
//!
//! Verification is a pure function of the token and the signing key plus the
//! wall clock; no state, no side effects. The concrete implementation in
//! `tandem-infra` uses HS256 JWTs.

use tandem_types::UserId;
use tandem_types::error::AuthError;

/// Validates an opaque session token and yields the user it was issued for.
pub trait TokenVerifier: Send + Sync {
    /// Returns the user id encoded in the token, or `None` when the token is
    /// malformed, signed with a different key, or expired.
    ///
    /// Never panics on malformed input.
    fn verify(&self, token: &str) -> Option<UserId>;
}

/// Issues session tokens at login.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: UserId) -> Result<String, AuthError>;
}

// Both traits are object-safe and stateless to callers, so a shared instance
// behind an Arc works wherever the bare type does.
impl<T: TokenVerifier + ?Sized> TokenVerifier for std::sync::Arc<T> {
    fn verify(&self, token: &str) -> Option<UserId> {
        (**self).verify(token)
    }
}

impl<T: TokenIssuer + ?Sized> TokenIssuer for std::sync::Arc<T> {
    fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        (**self).issue(user_id)
    }
}
