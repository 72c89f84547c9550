use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::claims::CredentialPayload;
use crate::auth::ttl::TokenTtl;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in our backend-issued session tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Identity subject (user id)
    #[serde(rename = "sub")]
    pub subject_id: String,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Unique per issuance, so two tokens minted within the same second differ.
    pub jti: String,
}

impl Claims {
    pub fn payload(&self) -> CredentialPayload {
        CredentialPayload {
            subject_id: self.subject_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Why a presented token was refused. Logged, never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFault {
    Expired,
    BadSignature,
    Malformed,
}

impl TokenFault {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenFault::Expired => "expired",
            TokenFault::BadSignature => "invalid_signature",
            TokenFault::Malformed => "malformed",
        }
    }
}

fn unix_secs(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("Failed to get current time"))
}

/// Mint an HS256 session token for an already-verified identity.
///
/// `exp` is `iat + ttl` in whole seconds. A zero `ttl` yields a token that is
/// already expired.
pub fn mint_access_token(
    subject_id: &str,
    email: &str,
    ttl: TokenTtl,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_secs(now)?;
    let exp = iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));

    let claims = Claims {
        subject_id: subject_id.to_string(),
        email: email.to_string(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(security.algorithm()),
        &claims,
        &EncodingKey::from_secret(security.jwt_secret()),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a session token and return its claims.
///
/// Every failure maps to `AppError::InvalidCredential`; the attached
/// `TokenFault` records which check failed.
pub fn verify_access_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, AppError> {
    // Pin the algorithm. Expiry is checked below against `now` only, with
    // no leeway.
    let mut validation = Validation::new(security.algorithm());
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.jwt_secret()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let fault = match e.kind() {
            ErrorKind::ExpiredSignature => TokenFault::Expired,
            ErrorKind::InvalidSignature => TokenFault::BadSignature,
            _ => TokenFault::Malformed,
        };
        AppError::invalid_credential(fault)
    })?;

    // A token is dead from the second its expiry is reached.
    if claims.exp <= unix_secs(now)? {
        return Err(AppError::invalid_credential(TokenFault::Expired));
    }

    if claims.subject_id.trim().is_empty() || claims.email.trim().is_empty() {
        return Err(AppError::invalid_credential(TokenFault::Malformed));
    }

    Ok(claims)
}
