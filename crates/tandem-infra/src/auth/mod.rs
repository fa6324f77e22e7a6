//! Authentication backends: Argon2 password hashing and JWT session tokens.

pub mod password;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use token::JwtTokenService;
