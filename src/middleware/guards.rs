use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde::Deserialize;

use crate::{
    auth::{AccessTokenValidator, Authenticator, Principal, RefreshPrincipal, RefreshTokenValidator},
    error::AppError,
    state::AppState,
};

/// Token from an `Authorization: Bearer <token>` header, if one is present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Guard for routes protected by the access-token strategy.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Self(principal));
        }

        let principal = AccessTokenValidator::from_state(state)
            .authenticate(bearer_token(&parts.headers))
            .await?;

        parts.extensions.insert(principal.clone());
        Ok(Self(principal))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    refresh_token: Option<String>,
}

/// Guard for the refresh route. Consumes the body, so it must be the last
/// extractor of the handler.
#[derive(Debug, Clone)]
pub struct RefreshUser(pub RefreshPrincipal);

impl FromRequest<Arc<AppState>> for RefreshUser {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::session_rejected())?;
        let body: RefreshBody = serde_json::from_slice(&bytes).map_err(|err| {
            tracing::debug!(error = %err, "refresh body is not valid json");
            AppError::session_rejected()
        })?;

        let principal = RefreshTokenValidator::from_state(state)
            .authenticate(body.refresh_token.as_deref())
            .await?;
        Ok(Self(principal))
    }
}
