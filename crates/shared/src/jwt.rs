//! JWT token generation and validation.
//!
//! The token subject is the caller's account id. Handlers always take the
//! acting account from verified claims, never from a request payload.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AccountId;

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: i64,
}

fn default_token_expiry_secs() -> i64 {
    900 // 15 minutes
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_expiry_secs: default_token_expiry_secs(),
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated account id.
    pub sub: String,
    /// Issued-at timestamp (unix seconds).
    pub iat: i64,
    /// Expiry timestamp (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an account, expiring at the given time.
    #[must_use]
    pub fn new(account_id: AccountId, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Parses the subject back into an account id.
    pub fn account_id(&self) -> Result<AccountId, JwtError> {
        self.sub.parse().map_err(|_| JwtError::Invalid)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for an account.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(&self, account_id: AccountId) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.token_expiry_secs);
        let claims = Claims::new(account_id, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry_secs: 900,
        })
    }

    #[test]
    fn test_generate_and_validate_roundtrip() {
        let svc = service();
        let account_id = AccountId::new();

        let token = svc.generate_token(account_id).unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.account_id().unwrap(), account_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let token = svc.generate_token(AccountId::new()).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');

        assert!(matches!(
            svc.validate_token(&tampered),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let token = svc.generate_token(AccountId::new()).unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "other-secret".to_string(),
            token_expiry_secs: 900,
        });

        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well past the default validation leeway.
        let svc = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry_secs: -3600,
        });
        let token = svc.generate_token(AccountId::new()).unwrap();

        assert!(matches!(
            svc.validate_token(&token),
            Err(JwtError::Expired)
        ));
    }
}
