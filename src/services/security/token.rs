use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::UserId;

/// Opaque bearer token handed to clients on register/login.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid 'sub' (expected numeric user id)")]
    InvalidSubject,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Signs and verifies HS256 access tokens.
///
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = leeway_seconds;

        Self {
            issuer,
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: UserId) -> Result<Token, TokenError> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: UserId, now: i64) -> Result<Token, TokenError> {
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds as i64,
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;
        Ok(Token(token))
    }

    /// Check signature, issuer and expiry, then return the subject.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::InvalidSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, "payments-test", 600, 0)
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let tokens = issuer();
        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.verify(token.as_str()).unwrap(), 42);
    }

    #[test]
    fn each_token_is_unique() {
        let tokens = issuer();
        assert_ne!(tokens.issue(1).unwrap(), tokens.issue(1).unwrap());
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer();
        let an_hour_ago = chrono::Utc::now().timestamp() - 3600;
        let token = tokens.issue_at(42, an_hour_ago).unwrap();
        assert!(matches!(tokens.verify(token.as_str()), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = TokenIssuer::new(b"another-secret-another-secret-00", "payments-test", 600, 0);
        let token = other.issue(42).unwrap();
        assert!(issuer().verify(token.as_str()).is_err());
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let other = TokenIssuer::new(SECRET, "someone-else", 600, 0);
        let token = other.issue(42).unwrap();
        assert!(issuer().verify(token.as_str()).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(issuer().verify("not-a-jwt").is_err());
        assert!(issuer().verify("").is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let tokens = issuer();
        let token = tokens.issue(1).unwrap();
        assert!(!format!("{tokens:?}").contains("0123456789"));
        assert!(!format!("{token:?}").contains(token.as_str()));
    }
}
