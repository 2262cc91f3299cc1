use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::{DaoBase, DaoResult, HasIdActiveModel, TimestampedActiveModel};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn new_record(
    user_id: Uuid,
    token: String,
    expires_at: DateTimeWithTimeZone,
) -> refresh_token::ActiveModel {
    refresh_token::ActiveModel {
        token: Set(token),
        user_id: Set(user_id),
        expires_at: Set(expires_at),
        ..Default::default()
    }
}

impl RefreshTokenDao {
    pub async fn create_refresh_token(
        &self,
        user_id: &Uuid,
        token: &str,
        expires_at: DateTimeWithTimeZone,
    ) -> DaoResult<refresh_token::Model> {
        self.create(new_record(*user_id, token.to_string(), expires_at))
            .await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(refresh_token::Column::Token.eq(token)))
            .await
    }

    /// Swaps `old_token` for `new_token` atomically. Returns `None` when
    /// `old_token` no longer belongs to the user, which happens when a
    /// concurrent rotation consumed it first; nothing is written then.
    pub async fn rotate(
        &self,
        user_id: &Uuid,
        old_token: &str,
        new_token: &str,
        expires_at: DateTimeWithTimeZone,
    ) -> DaoResult<Option<refresh_token::Model>> {
        let txn = self.db.begin().await?;

        let consumed = RefreshToken::delete_many()
            .filter(refresh_token::Column::Token.eq(old_token))
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .exec(&txn)
            .await?;
        if consumed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let now = Utc::now().fixed_offset();
        let mut active = new_record(*user_id, new_token.to_string(), expires_at);
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        let inserted = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(Some(inserted))
    }

    /// Deletes one of the user's tokens. Unknown tokens are not an error.
    pub async fn revoke_token(&self, user_id: &Uuid, token: &str) -> DaoResult<u64> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn revoke_all_for_user(&self, user_id: &Uuid) -> DaoResult<u64> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
