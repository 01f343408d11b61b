//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and opaque
//!   refresh-token generation.
//! - [`blacklist`] -- access-token revocation service.

pub mod blacklist;
pub mod jwt;
pub mod password;

/// Why an authentication attempt was rejected.
///
/// Every variant is surfaced to the client as the same generic 401 response
/// (see `AppError::Auth`); the distinction exists for logs and tests only.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password -- never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Malformed, badly-signed, or expired token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The token verified but its jti is on the blacklist.
    #[error("token has been revoked")]
    RevokedToken,

    /// The token verified but its subject no longer resolves to a user.
    #[error("principal not found")]
    PrincipalNotFound,
}
