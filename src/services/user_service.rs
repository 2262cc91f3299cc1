use uuid::Uuid;

use crate::{
    auth::password,
    db::dao::{DaoBase, RefreshTokenDao, UserDao},
    db::entities::user,
    error::AppError,
    services::{conflict_on_unique, required_text},
};

pub(crate) const EMAIL_TAKEN: &str = "Email already registered";
pub(crate) const USERNAME_TAKEN: &str = "Username already taken";

/// Emails are compared and stored lower-cased.
pub(crate) fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::bad_request("Invalid email address")),
    }
}

pub(crate) fn normalize_username(raw: &str) -> Result<String, AppError> {
    required_text(raw, "Username")
}

#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
    refresh_token_dao: RefreshTokenDao,
}

impl UserService {
    pub fn new(user_dao: UserDao, refresh_token_dao: RefreshTokenDao) -> Self {
        Self {
            user_dao,
            refresh_token_dao,
        }
    }

    pub async fn profile(&self, user_id: &Uuid) -> Result<user::Model, AppError> {
        Ok(self.user_dao.find_by_id(*user_id).await?)
    }

    pub async fn update_profile(
        &self,
        user_id: &Uuid,
        changes: ProfileChanges,
    ) -> Result<user::Model, AppError> {
        let current = self.profile(user_id).await?;

        let username = match changes.username {
            Some(raw) => Some(normalize_username(&raw)?),
            None => None,
        };
        let email = match changes.email {
            Some(raw) => Some(normalize_email(&raw)?),
            None => None,
        };

        let username = username.filter(|name| *name != current.username);
        if let Some(name) = &username {
            if self.user_dao.find_by_username(name).await?.is_some() {
                return Err(AppError::conflict(USERNAME_TAKEN));
            }
        }
        let email = email.filter(|address| *address != current.email);
        if let Some(address) = &email {
            if self.user_dao.find_by_email(address).await?.is_some() {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }

        if username.is_none() && email.is_none() {
            return Ok(current);
        }

        self.user_dao
            .update_profile(user_id, username, email)
            .await
            .map_err(|err| conflict_on_unique(err, "Username or email already in use"))
    }

    /// Replaces the password hash and signs the user out of every session.
    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.profile(user_id).await?;
        if !password::verify_password(current_password, &user.password_hash)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let hash = password::hash_password(new_password)?;
        self.user_dao.set_password_hash(user_id, &hash).await?;
        let revoked = self.refresh_token_dao.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "password changed");
        Ok(())
    }

    pub async fn delete_account(&self, user_id: &Uuid, password: &str) -> Result<(), AppError> {
        let user = self.profile(user_id).await?;
        if !password::verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Password is incorrect"));
        }

        self.user_dao.delete_account(user_id).await?;
        tracing::info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}
