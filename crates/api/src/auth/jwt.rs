//! JWT access-token generation/validation and refresh-token generation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload with
//! a unique `jti` used as the revocation key. Refresh tokens are opaque
//! random strings persisted raw by the refresh-token store: they are bearer
//! secrets scoped to the refresh endpoint only and die on first use.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of random bytes behind each opaque refresh token.
const REFRESH_TOKEN_BYTES: usize = 32;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's username.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
    /// Whether revoked-token checks run at all. Disable only in test or
    /// compatibility environments that cannot afford the persistence hit.
    pub blacklist_enabled: bool,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `JWT_SECRET`                | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`    | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`   | no       | `7`     |
    /// | `TOKEN_BLACKLIST_ENABLED`   | no       | `true`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        let blacklist_enabled: bool = std::env::var("TOKEN_BLACKLIST_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("TOKEN_BLACKLIST_ENABLED must be 'true' or 'false'");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
            blacklist_enabled,
        }
    }
}

/// Generate an HS256 access token for the given username.
///
/// The token contains the subject, issue time, expiration, and a unique
/// `jti` claim that serves as the revocation key.
pub fn generate_access_token(
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: username.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration. The blacklist is NOT consulted
/// here -- that is a separate, higher-level check done by the identity
/// extractor, which is why revoking a token does not make it undecodable.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate a cryptographically random, URL-safe opaque refresh token.
///
/// 32 bytes of OS entropy, base64url-encoded without padding. The string is
/// both what the client receives and what the store persists.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
