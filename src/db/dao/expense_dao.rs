use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, Page};
use crate::db::entities::expense;
use crate::db::entities::prelude::Expense;

#[derive(Clone)]
pub struct ExpenseDao {
    db: DatabaseConnection,
}

impl DaoBase for ExpenseDao {
    type Entity = Expense;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub name: String,
    pub amount: f64,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ExpenseChanges {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

impl ExpenseFilter {
    /// Rows owned by `user_id` that also match every set field.
    fn condition(&self, user_id: Uuid) -> Condition {
        let mut condition = Condition::all().add(expense::Column::UserId.eq(user_id));
        if let Some(start) = self.start_date {
            condition = condition.add(expense::Column::Date.gte(start));
        }
        if let Some(end) = self.end_date {
            condition = condition.add(expense::Column::Date.lte(end));
        }
        if let Some(category_id) = self.category_id {
            condition = condition.add(expense::Column::CategoryId.eq(category_id));
        }
        condition
    }
}

impl ExpenseDao {
    pub async fn create_expense(
        &self,
        user_id: &Uuid,
        data: NewExpense,
    ) -> DaoResult<expense::Model> {
        let model = expense::ActiveModel {
            user_id: Set(*user_id),
            category_id: Set(data.category_id),
            name: Set(data.name),
            amount: Set(data.amount),
            date: Set(data.date),
            notes: Set(data.notes),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_owned(&self, user_id: &Uuid, id: &Uuid) -> DaoResult<Option<expense::Model>> {
        let (user_id, id) = (*user_id, *id);
        self.find_one(move |query| {
            query
                .filter(expense::Column::Id.eq(id))
                .filter(expense::Column::UserId.eq(user_id))
        })
        .await
    }

    /// Newest expense date first.
    pub async fn list_for_user(
        &self,
        user_id: &Uuid,
        page: u64,
        limit: u64,
        filter: &ExpenseFilter,
    ) -> DaoResult<Page<expense::Model>> {
        let condition = filter.condition(*user_id);
        self.page(
            page,
            limit,
            Some((expense::Column::Date, Order::Desc)),
            move |query| query.filter(condition),
        )
        .await
    }

    pub async fn recent(&self, user_id: &Uuid, limit: u64) -> DaoResult<Vec<expense::Model>> {
        let user_id = *user_id;
        self.window(
            1,
            limit,
            Some((expense::Column::Date, Order::Desc)),
            move |query| query.filter(expense::Column::UserId.eq(user_id)),
        )
        .await
    }

    pub async fn update_expense(
        &self,
        id: &Uuid,
        changes: ExpenseChanges,
    ) -> DaoResult<expense::Model> {
        self.update(*id, move |active| {
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(amount) = changes.amount {
                active.amount = Set(amount);
            }
            if let Some(category_id) = changes.category_id {
                active.category_id = Set(category_id);
            }
            if let Some(date) = changes.date {
                active.date = Set(date);
            }
            if let Some(notes) = changes.notes {
                active.notes = Set(Some(notes));
            }
        })
        .await
    }

    pub async fn delete_expense(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }

    pub async fn count_by_category(&self, category_id: &Uuid) -> DaoResult<u64> {
        Expense::find()
            .filter(expense::Column::CategoryId.eq(*category_id))
            .count(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Sum of the user's expenses dated within `[start, end]`.
    pub async fn total_between(
        &self,
        user_id: &Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DaoResult<f64> {
        let total = Expense::find()
            .select_only()
            .column_as(expense::Column::Amount.sum(), "total")
            .filter(expense::Column::UserId.eq(*user_id))
            .filter(expense::Column::Date.between(start, end))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(total.flatten().unwrap_or(0.0))
    }
}
