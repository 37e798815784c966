//! Bearer token authentication extractors.
//!
//! Tokens are HS256 JWTs issued by the identity provider; the `sub` claim is
//! the user id.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::{extract_user_id, JwtConfig};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user taken from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl UserAuth {
    fn from_token(jwt: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;
        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("Authorization") {
            return Err(ApiError::Unauthorized(
                "Missing Authorization header".to_string(),
            ));
        }
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        UserAuth::from_token(&state.jwt, token)
    }
}

/// Authentication that never rejects; an invalid token counts as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = bearer_token(parts).and_then(|token| UserAuth::from_token(&state.jwt, token).ok());
        Ok(OptionalUserAuth(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[test]
    fn test_from_token() {
        let jwt = JwtConfig::new("test-secret").unwrap();
        let user_id = Uuid::new_v4();
        let token = jwt.generate_access_token(user_id, 3600).unwrap();

        let auth = UserAuth::from_token(&jwt, &token).unwrap();
        assert_eq!(auth.user_id, user_id);

        let other = JwtConfig::new("other-secret").unwrap();
        assert!(matches!(
            UserAuth::from_token(&other, &token),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
