//! Validation of access tokens issued by the external identity provider.
//!
//! Tokens are HS256-signed JWTs sharing a secret with the provider. This
//! service never issues tokens; it only checks them and reads the
//! [`Claims`].

use jsonwebtoken::{decode, DecodingKey, Validation};
use rise_core::types::{DbId, UserId};
use serde::{Deserialize, Serialize};

/// Claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the identity provider's user UUID.
    pub sub: UserId,
    #[serde(default)]
    pub email: Option<String>,
    /// Profile the client asked to act as, if any.
    #[serde(default)]
    pub active_profile_id: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
}

impl JwtConfig {
    /// Load the shared secret from `AUTH_JWT_SECRET`.
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature and expiration. The audience is the provider's
/// concern and is not checked.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.validate_aud = false;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
