use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel, Order,
    PaginatorTrait, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

/// Largest window a single query may return.
pub const MAX_WINDOW: u64 = 100;

/// One page of rows plus the number of rows matching the whole query.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

type ModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
type ColumnOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Column;
type SelectOf<D> = Select<<D as DaoBase>::Entity>;

fn check_window(page: u64, page_size: u64) -> DaoResult<()> {
    if page == 0 || page_size == 0 || page_size > MAX_WINDOW {
        return Err(DaoLayerError::InvalidPagination { page, page_size });
    }
    Ok(())
}

// Caller order first; creation time breaks ties, newest first.
fn ordered<E>(select: Select<E>, order: Option<(E::Column, Order)>) -> Select<E>
where
    E: EntityTrait + HasCreatedAtColumn,
{
    let select = match order {
        Some((column, direction)) => select.order_by(column, direction),
        None => select,
    };
    select.order_by_desc(E::created_at_column())
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    <Self::Entity as EntityTrait>::Column: Send + Sync,
    Self::Entity: HasCreatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    /// Inserts with a fresh id and both timestamps set to now.
    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<ModelOf<Self>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        Ok(active.insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<ModelOf<Self>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: std::any::type_name::<Self::Entity>(),
                id,
            })
    }

    async fn find_one(
        &self,
        scope: impl FnOnce(SelectOf<Self>) -> SelectOf<Self> + Send,
    ) -> DaoResult<Option<ModelOf<Self>>> {
        Ok(scope(Self::Entity::find()).one(self.db()).await?)
    }

    /// Every row in `scope`, unpaged.
    async fn list(
        &self,
        order: Option<(ColumnOf<Self>, Order)>,
        scope: impl FnOnce(SelectOf<Self>) -> SelectOf<Self> + Send,
    ) -> DaoResult<Vec<ModelOf<Self>>> {
        Ok(ordered(scope(Self::Entity::find()), order)
            .all(self.db())
            .await?)
    }

    /// Rows `(page - 1) * page_size ..` of `scope`, without counting.
    async fn window(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(ColumnOf<Self>, Order)>,
        scope: impl FnOnce(SelectOf<Self>) -> SelectOf<Self> + Send,
    ) -> DaoResult<Vec<ModelOf<Self>>> {
        check_window(page, page_size)?;
        Ok(ordered(scope(Self::Entity::find()), order)
            .limit(page_size)
            .offset((page - 1).saturating_mul(page_size))
            .all(self.db())
            .await?)
    }

    /// Like `window`, with the total row count of `scope` alongside.
    async fn page(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(ColumnOf<Self>, Order)>,
        scope: impl FnOnce(SelectOf<Self>) -> SelectOf<Self> + Send,
    ) -> DaoResult<Page<ModelOf<Self>>> {
        check_window(page, page_size)?;
        let select = scope(Self::Entity::find());
        let total = select.clone().count(self.db()).await?;
        let items = self
            .window(page, page_size, order, move |_| select)
            .await?;
        Ok(Page { items, total })
    }

    /// Loads the row, lets `edit` change it and bumps `updated_at`.
    async fn update<F>(&self, id: Uuid, edit: F) -> DaoResult<ModelOf<Self>>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let mut active = self.find_by_id(id).await?.into_active_model();
        edit(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());
        Ok(active.update(self.db()).await?)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;
        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: std::any::type_name::<Self::Entity>(),
                id,
            });
        }
        Ok(id)
    }
}
