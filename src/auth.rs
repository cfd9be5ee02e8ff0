//! Bearer-token authentication.
//!
//! Tokens are HS256-signed claim sets issued by the login service. This
//! module only verifies: handlers take a [`CurrentUser`] argument and axum
//! rejects the request before the handler body runs when the
//! `Authorization: Bearer` header is missing, expired or unverifiable —
//! each with its own message so clients can tell a stale session from a
//! garbage token.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Client identifier.
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for a client. The service itself never issues tokens to
    /// callers; this exists for tooling and tests.
    pub fn issue(
        &self,
        client_id: Uuid,
        role: &str,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: client_id,
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::TokenInvalid,
            })
    }
}

/// Authenticated caller, extracted from the bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: String,
}

impl CurrentUser {
    /// Reject callers whose token does not carry the given role.
    pub fn require_role(&self, role: &str) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::TokenMissing)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::TokenMissing)?;
        let claims = state.jwt.verify(token)?;
        Ok(CurrentUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret-at-least-this-long")
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let client_id = Uuid::new_v4();
        let token = keys().issue(client_id, "client", Duration::hours(24)).unwrap();
        let claims = keys().verify(&token).unwrap();
        assert_eq!(claims.sub, client_id);
        assert_eq!(claims.role, "client");
    }

    #[test]
    fn expired_token_is_distinguished() {
        let token = keys()
            .issue(Uuid::new_v4(), "client", Duration::hours(-2))
            .unwrap();
        match keys().verify(&token) {
            Err(ApiError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = keys()
            .issue(Uuid::new_v4(), "client", Duration::hours(24))
            .unwrap();
        let wrong = JwtKeys::new("a-completely-different-secret!!");
        match wrong.verify(&token) {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }

    #[test]
    fn role_check() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            role: "client".into(),
        };
        assert!(user.require_role("client").is_ok());
        assert!(matches!(
            user.require_role("admin"),
            Err(ApiError::Forbidden)
        ));
    }
}
