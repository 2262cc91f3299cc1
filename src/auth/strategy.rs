//! The two ways a request proves who it is: a bearer access token, or a
//! refresh token carried in the body. Both reject with the same
//! `Unauthorized` so a caller cannot tell which check failed; the reason is
//! only logged.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use super::{Principal, RefreshPrincipal, jwt::TokenIssuer};
use crate::{
    db::dao::{DaoBase, DaoContext, DaoLayerError, RefreshTokenDao, UserDao},
    db::entities::user,
    error::AppError,
    state::AppState,
};

#[async_trait]
pub trait Authenticator: Send + Sync {
    type Identity: Send;

    async fn authenticate(&self, token: Option<&str>) -> Result<Self::Identity, AppError>;
}

fn reject(reason: &'static str) -> AppError {
    tracing::debug!(reason, "credential rejected");
    AppError::session_rejected()
}

/// A refresh record is dead from the instant `expires_at` is reached.
pub fn is_expired(expires_at: DateTimeWithTimeZone, now: DateTimeWithTimeZone) -> bool {
    expires_at <= now
}

/// Trims a supplied token; blank counts as absent.
pub(crate) fn present(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|token| !token.is_empty())
}

async fn load_active_user(users: &UserDao, id: Uuid) -> Result<user::Model, AppError> {
    let user = match users.find_by_id(id).await {
        Ok(user) => user,
        Err(DaoLayerError::NotFound { .. }) => return Err(reject("user no longer exists")),
        Err(err) => return Err(err.into()),
    };
    if !user.is_active {
        return Err(reject("user is inactive"));
    }
    Ok(user)
}

#[derive(Clone)]
pub struct AccessTokenValidator {
    users: UserDao,
    tokens: TokenIssuer,
}

impl AccessTokenValidator {
    pub fn new(users: UserDao, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(DaoContext::new(&state.db).user(), state.tokens.clone())
    }
}

#[async_trait]
impl Authenticator for AccessTokenValidator {
    type Identity = Principal;

    async fn authenticate(&self, token: Option<&str>) -> Result<Principal, AppError> {
        let token = present(token).ok_or_else(|| reject("missing access token"))?;
        let claims = self
            .tokens
            .decode_access(token)
            .map_err(|_| reject("access token signature or expiry invalid"))?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| reject("access token subject malformed"))?;

        let user = load_active_user(&self.users, user_id).await?;
        Ok(Principal {
            sub: user.id,
            email: user.email,
            username: user.username,
        })
    }
}

#[derive(Clone)]
pub struct RefreshTokenValidator {
    users: UserDao,
    refresh_tokens: RefreshTokenDao,
    tokens: TokenIssuer,
}

impl RefreshTokenValidator {
    pub fn new(users: UserDao, refresh_tokens: RefreshTokenDao, tokens: TokenIssuer) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        let daos = DaoContext::new(&state.db);
        Self::new(daos.user(), daos.refresh_token(), state.tokens.clone())
    }
}

#[async_trait]
impl Authenticator for RefreshTokenValidator {
    type Identity = RefreshPrincipal;

    async fn authenticate(&self, token: Option<&str>) -> Result<RefreshPrincipal, AppError> {
        let token = present(token).ok_or_else(|| reject("refresh token missing from body"))?;
        let claims = self
            .tokens
            .decode_refresh(token)
            .map_err(|_| reject("refresh token signature or expiry invalid"))?;

        let record = self
            .refresh_tokens
            .find_by_token(token)
            .await?
            .ok_or_else(|| reject("refresh token not on record"))?;
        if is_expired(record.expires_at, Utc::now().fixed_offset()) {
            return Err(reject("refresh token record expired"));
        }
        if claims.sub != record.user_id.to_string() {
            return Err(reject("refresh token subject does not match record"));
        }

        let user = load_active_user(&self.users, record.user_id).await?;
        Ok(RefreshPrincipal {
            sub: user.id,
            email: user.email,
            username: user.username,
            refresh_token: record.token,
        })
    }
}
