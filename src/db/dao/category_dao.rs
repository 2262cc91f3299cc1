use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::category;
use crate::db::entities::prelude::Category;

#[derive(Clone)]
pub struct CategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for CategoryDao {
    type Entity = Category;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Default, Clone)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CategoryDao {
    pub async fn create_category(
        &self,
        user_id: &Uuid,
        name: &str,
        icon: Option<String>,
        color: Option<String>,
    ) -> DaoResult<category::Model> {
        let model = category::ActiveModel {
            user_id: Set(*user_id),
            name: Set(name.to_string()),
            icon: Set(icon),
            color: Set(color),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_user(&self, user_id: &Uuid) -> DaoResult<Vec<category::Model>> {
        let user_id = *user_id;
        self.list(Some((category::Column::Name, Order::Asc)), move |query| {
            query.filter(category::Column::UserId.eq(user_id))
        })
        .await
    }

    pub async fn find_owned(
        &self,
        user_id: &Uuid,
        id: &Uuid,
    ) -> DaoResult<Option<category::Model>> {
        let (user_id, id) = (*user_id, *id);
        self.find_one(move |query| {
            query
                .filter(category::Column::Id.eq(id))
                .filter(category::Column::UserId.eq(user_id))
        })
        .await
    }

    pub async fn find_by_name(
        &self,
        user_id: &Uuid,
        name: &str,
    ) -> DaoResult<Option<category::Model>> {
        let (user_id, name) = (*user_id, name.to_string());
        self.find_one(move |query| {
            query
                .filter(category::Column::UserId.eq(user_id))
                .filter(category::Column::Name.eq(name))
        })
        .await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.list(None, move |query| query.filter(category::Column::Id.is_in(ids)))
        .await
    }

    pub async fn update_category(
        &self,
        id: &Uuid,
        changes: CategoryChanges,
    ) -> DaoResult<category::Model> {
        self.update(*id, move |active| {
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(icon) = changes.icon {
                active.icon = Set(Some(icon));
            }
            if let Some(color) = changes.color {
                active.color = Set(Some(color));
            }
        })
        .await
    }

    pub async fn delete_category(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}
