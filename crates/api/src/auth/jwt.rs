//! JWT access-token validation and generation.
//!
//! Accounts live on the school district's identity platform; this service
//! only verifies the HS256 tokens it issues, signed with a shared secret.
//! [`generate_access_token`] mirrors the platform's token format and is
//! used by tests and local tooling.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fundra_core::types::DbId;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the account id on the identity platform.
    pub sub: DbId,
    /// The account's role name (e.g. `"admin"`, `"principal"`, `"donor"`).
    pub role: String,
    /// School scope for school staff and principal tokens; absent for
    /// admin and donor tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<DbId>,
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
    /// HMAC-SHA256 secret shared with the identity platform.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `15`    |
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

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for the given account.
///
/// The token contains the account id, role, optional school scope, issue
/// time, expiration, and a unique `jti` claim.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    school_id: Option<DbId>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        school_id,
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
/// Validates the signature, expiration, and issued-at claims automatically.
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
