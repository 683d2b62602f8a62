//! Access token issuing and verification (HS256 JWT)

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SECRET_KEY_SIZE: usize = 32;
pub const ISSUER: &str = "simple_bank";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid key size: must be at least {MIN_SECRET_KEY_SIZE} characters")]
    InvalidKeySize,

    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub id: Uuid,
    pub username: String,
    pub issuer: String,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens
pub trait TokenMaker: Send + Sync {
    /// Issue a token for `username` valid for `duration`
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError>;

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;
}

/// JWT registered claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    jti: Uuid,
    sub: String,
    iss: String,
    iat: i64,
    nbf: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtMaker").finish_non_exhaustive()
    }
}

impl JwtMaker {
    pub fn new(secret_key: &str) -> Result<Self, TokenError> {
        if secret_key.len() < MIN_SECRET_KEY_SIZE {
            return Err(TokenError::InvalidKeySize);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
        })
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let issued_at = Utc::now();
        let payload = Payload {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issuer: ISSUER.to_string(),
            issued_at,
            not_before: issued_at,
            expires_at: issued_at + duration,
        };

        let claims = Claims {
            jti: payload.id,
            sub: payload.username.clone(),
            iss: payload.issuer.clone(),
            iat: payload.issued_at.timestamp(),
            nbf: payload.not_before.timestamp(),
            exp: payload.expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let claims = data.claims;
        Ok(Payload {
            id: claims.jti,
            username: claims.sub,
            issuer: claims.iss,
            issued_at: from_timestamp(claims.iat)?,
            not_before: from_timestamp(claims.nbf)?,
            expires_at: from_timestamp(claims.exp)?,
        })
    }
}

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(TokenError::Invalid)
}
