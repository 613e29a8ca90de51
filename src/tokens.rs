//! Signing and verification of the session tokens carried in cookies.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

/// Distinguishes the two token roles; a refresh token must never pass an
/// access-token check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID the token belongs to.
    pub sub: i32,
    pub kind: TokenKind,
    /// Unique token ID, the unit of revocation.
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// A freshly signed token with the metadata the cookie layer needs.
pub struct SignedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenManager {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::days(config.refresh_token_days),
        }
    }

    pub fn sign_access(&self, user_id: i32) -> Result<SignedToken> {
        self.sign(user_id, TokenKind::Access, self.access_ttl)
    }

    pub fn sign_refresh(&self, user_id: i32) -> Result<SignedToken> {
        self.sign(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    fn sign(&self, user_id: i32, kind: TokenKind, ttl: Duration) -> Result<SignedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id,
            kind,
            jti: jti.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to sign token")?;

        Ok(SignedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Decode and check a token; signature and expiry failures both surface
    /// as `None`.
    #[must_use]
    pub fn verify(&self, token: &str, expected_kind: TokenKind) -> Option<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .ok()?
            .claims;

        (claims.kind == expected_kind).then_some(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_access_token_round_trip() {
        let manager = manager();
        let signed = manager.sign_access(42).unwrap();

        let claims = manager.verify(&signed.token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.jti, signed.jti);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let manager = manager();
        let signed = manager.sign_refresh(42).unwrap();

        assert!(manager.verify(&signed.token, TokenKind::Access).is_none());
        assert!(manager.verify(&signed.token, TokenKind::Refresh).is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signed = manager().sign_access(7).unwrap();

        let other = TokenManager::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..AuthConfig::default()
        });
        assert!(other.verify(&signed.token, TokenKind::Access).is_none());
    }
}
