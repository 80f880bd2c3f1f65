//! Access and refresh tokens (HS256 JWTs)
//!
//! Both token kinds carry the user id, role, token type and the user's token
//! version at issue time. The version lets the service revoke every
//! outstanding token of a user by bumping a single counter.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};
use crate::models::{Role, User};

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub typ: TokenType,
    /// Token version of the user when the token was issued
    pub ver: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub.parse().map_err(|_| AppError::Unauthorized)
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn issue_pair(&self, user: &User, now: DateTime<Utc>) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user, TokenType::Access, now)?,
            refresh_token: self.issue(user, TokenType::Refresh, now)?,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_ttl.num_seconds(),
        })
    }

    pub fn issue(&self, user: &User, typ: TokenType, now: DateTime<Utc>) -> Result<String> {
        let ttl = match typ {
            TokenType::Access => self.config.access_ttl,
            TokenType::Refresh => self.config.refresh_ttl,
        };
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal {
                reason: format!("token lifetime {ttl} overflows the clock"),
            })?;
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            typ,
            ver: user.token_version,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AppError::TokenEncoding)
    }

    /// Decodes and checks signature, expiry and token type.
    ///
    /// Any failure is reported as `Unauthorized`; the cause is only logged.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AppError::Unauthorized
            })?
            .claims;
        if claims.typ != expected {
            tracing::debug!(got = ?claims.typ, ?expected, "token type mismatch");
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}
