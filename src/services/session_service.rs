use uuid::Uuid;

use crate::{
    auth::{TokenPair, jwt::TokenIssuer, password, strategy::present},
    db::dao::{DaoBase, RefreshTokenDao, UserDao},
    db::entities::user,
    error::AppError,
    services::{
        conflict_on_unique,
        user_service::{EMAIL_TAKEN, USERNAME_TAKEN, normalize_email, normalize_username},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A user together with a freshly issued token pair.
#[derive(Debug, Clone)]
pub struct SessionBundle {
    pub user: user::Model,
    pub tokens: TokenPair,
}

/// Register, login, refresh-token rotation and logout.
#[derive(Clone)]
pub struct SessionService {
    user_dao: UserDao,
    refresh_token_dao: RefreshTokenDao,
    tokens: TokenIssuer,
}

impl SessionService {
    pub fn new(user_dao: UserDao, refresh_token_dao: RefreshTokenDao, tokens: TokenIssuer) -> Self {
        Self {
            user_dao,
            refresh_token_dao,
            tokens,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionBundle, AppError> {
        let username = normalize_username(username)?;
        let email = normalize_email(email)?;
        password::check_strength(password)?;

        if self.user_dao.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        if self.user_dao.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict(USERNAME_TAKEN));
        }

        let hash = password::hash_password(password)?;
        let user = self
            .user_dao
            .create_user(&username, &email, &hash)
            .await
            .map_err(|err| conflict_on_unique(err, "Username or email already in use"))?;
        tracing::info!(user_id = %user.id, "user registered");

        let tokens = self.start_session(&user).await?;
        Ok(SessionBundle { user, tokens })
    }

    /// Unknown user, wrong password and deactivated account all fail the same way.
    pub async fn login(
        &self,
        email_or_username: &str,
        password: &str,
    ) -> Result<SessionBundle, AppError> {
        let Some(user) = self
            .user_dao
            .find_by_login(email_or_username.trim())
            .await?
        else {
            tracing::debug!("login for unknown user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !password::verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "login for deactivated account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.start_session(&user).await?;
        Ok(SessionBundle { user, tokens })
    }

    /// Rotates an already-validated refresh token. Exactly one of two
    /// concurrent calls with the same token succeeds.
    pub async fn refresh(&self, user_id: &Uuid, old_token: &str) -> Result<TokenPair, AppError> {
        let user = self.user_dao.find_by_id(*user_id).await?;
        let issued = self.tokens.issue(&user)?;

        let rotated = self
            .refresh_token_dao
            .rotate(
                user_id,
                old_token,
                &issued.pair.refresh_token,
                issued.refresh_expires_at,
            )
            .await?;
        if rotated.is_none() {
            tracing::warn!(user_id = %user_id, "refresh token already consumed");
            return Err(AppError::session_rejected());
        }

        tracing::debug!(user_id = %user_id, "refresh token rotated");
        Ok(issued.pair)
    }

    /// Revokes one session when `refresh_token` is given, otherwise all of them.
    pub async fn logout(&self, user_id: &Uuid, refresh_token: Option<&str>) -> Result<(), AppError> {
        let refresh_token = present(refresh_token);
        let revoked = match refresh_token {
            Some(token) => self.refresh_token_dao.revoke_token(user_id, token).await?,
            None => self.refresh_token_dao.revoke_all_for_user(user_id).await?,
        };
        tracing::info!(user_id = %user_id, revoked, everywhere = refresh_token.is_none(), "logout");
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<user::Model, AppError> {
        Ok(self.user_dao.find_by_id(*user_id).await?)
    }

    async fn start_session(&self, user: &user::Model) -> Result<TokenPair, AppError> {
        let issued = self.tokens.issue(user)?;
        self.refresh_token_dao
            .create_refresh_token(&user.id, &issued.pair.refresh_token, issued.refresh_expires_at)
            .await?;
        Ok(issued.pair)
    }
}
