//! Access-token validation
//!
//! Tokens are issued elsewhere; this service only verifies them and exposes the
//! caller's identity to handlers.
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

pub const ADMIN_ROLE: &str = "ADMIN";

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "UserId")]
    pub user_id: String,
    #[serde(alias = "Role")]
    pub role: String,
    pub exp: usize,
}

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("admin role required".to_string()))
        }
    }
}

/// Verifies HS256 access tokens
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn validate(&self, token: &str) -> AppResult<AuthUser> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))?;

        Ok(AuthUser {
            user_id: data.claims.user_id,
            role: data.claims.role,
        })
    }
}

fn bearer_token(request: &Request) -> AppResult<&str> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("no token provided".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("malformed authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("expected a bearer token".to_string()))
}

/// Rejects requests without a valid bearer token and stores the caller as [`AuthUser`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let user = state.tokens.validate(bearer_token(&request)?)?;

    tracing::debug!(user_id = %user.user_id, role = %user.role, "Request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
