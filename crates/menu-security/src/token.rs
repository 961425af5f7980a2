//! Signed session tokens (JWT)

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::session::Session;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Signed-in email
    pub sub: String,
    /// Session id
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn session_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sid).map_err(|e| TokenError::ValidationError(e.to_string()))
    }
}

pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Random hex secret for deployments that did not configure one.
    pub fn generate_secret() -> String {
        let bytes: [u8; 32] = rand::rng().random();
        hex::encode(bytes)
    }

    pub fn issue(&self, session: &Session) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: session.email.clone(),
            sid: session.id.to_string(),
            iat: session.issued_at.timestamp(),
            exp: session.expires_at.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::CreationError(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            _ => TokenError::ValidationError(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::new(TokenService::generate_secret());
        let session = Session::new("admin@menu.local", 3600);
        let token = service.issue(&session).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "admin@menu.local");
        assert_eq!(claims.session_id().unwrap(), session.id);
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let issuer = TokenService::new("secret-a".into());
        let verifier = TokenService::new("secret-b".into());
        let token = issuer.issue(&Session::new("admin@menu.local", 3600)).unwrap();
        assert!(matches!(
            verifier.validate(&token),
            Err(TokenError::ValidationError(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::new("secret".into());
        // Well past the default 60s leeway.
        let session = Session::new("admin@menu.local", -3600);
        let token = service.issue(&session).unwrap();
        assert!(matches!(service.validate(&token), Err(TokenError::TokenExpired)));
    }
}
