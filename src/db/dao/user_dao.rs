use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Budget, Category, Expense, RefreshToken, User};
use crate::db::entities::{budget, category, expense, refresh_token, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find_one(move |query| query.filter(user::Column::Username.eq(username)))
            .await
    }

    /// Emails are stored lower-cased, usernames as typed.
    pub async fn find_by_login(&self, email_or_username: &str) -> DaoResult<Option<user::Model>> {
        let email = email_or_username.to_lowercase();
        let username = email_or_username.to_string();
        self.find_one(move |query| {
            query.filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
        })
        .await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_profile(
        &self,
        id: &Uuid,
        username: Option<String>,
        email: Option<String>,
    ) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            if let Some(username) = username {
                active.username = Set(username);
            }
            if let Some(email) = email {
                active.email = Set(email);
            }
        })
        .await
    }

    pub async fn set_password_hash(&self, id: &Uuid, password_hash: &str) -> DaoResult<()> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }

    pub async fn set_active(&self, id: &Uuid, is_active: bool) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            active.is_active = Set(is_active);
        })
        .await
    }

    /// Removes the user and everything they own in one transaction.
    pub async fn delete_account(&self, id: &Uuid) -> DaoResult<()> {
        let txn = self.db.begin().await?;

        Expense::delete_many()
            .filter(expense::Column::UserId.eq(*id))
            .exec(&txn)
            .await?;
        Budget::delete_many()
            .filter(budget::Column::UserId.eq(*id))
            .exec(&txn)
            .await?;
        Category::delete_many()
            .filter(category::Column::UserId.eq(*id))
            .exec(&txn)
            .await?;
        RefreshToken::delete_many()
            .filter(refresh_token::Column::UserId.eq(*id))
            .exec(&txn)
            .await?;
        let deleted = User::delete_by_id(*id).exec(&txn).await?;

        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DaoLayerError::NotFound {
                entity: std::any::type_name::<User>(),
                id: *id,
            });
        }

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use super::UserDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::user;
    use crate::db::fixtures::{self, exec};

    #[tokio::test]
    async fn find_by_login_returns_match() {
        let alice = fixtures::user("alice");
        let id = alice.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[alice]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_login("Alice@X.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn find_by_username_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_username("nobody")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_active_propagates_not_found() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .set_active(&missing_id, false)
            .await
            .expect_err("update should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { id, .. } if id == missing_id
        ));
    }

    #[tokio::test]
    async fn delete_account_succeeds_when_user_row_is_removed() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(3), exec(1), exec(2), exec(2), exec(1)])
            .into_connection();
        let dao = UserDao::new(&db);

        dao.delete_account(&id)
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn delete_account_reports_missing_user() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(0), exec(0), exec(0), exec(0)])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .delete_account(&id)
            .await
            .expect_err("missing user should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_account_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("delete failed".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .delete_account(&Uuid::new_v4())
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
