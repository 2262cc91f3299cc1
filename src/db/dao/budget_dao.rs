use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::budget;
use crate::db::entities::prelude::Budget;

#[derive(Clone)]
pub struct BudgetDao {
    db: DatabaseConnection,
}

impl DaoBase for BudgetDao {
    type Entity = Budget;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub amount: f64,
    pub period_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Default, Clone)]
pub struct BudgetChanges {
    pub amount: Option<f64>,
    pub period_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl BudgetDao {
    pub async fn create_budget(&self, user_id: &Uuid, data: NewBudget) -> DaoResult<budget::Model> {
        let model = budget::ActiveModel {
            user_id: Set(*user_id),
            amount: Set(data.amount),
            period_type: Set(data.period_type),
            start_date: Set(data.start_date),
            end_date: Set(data.end_date),
            is_active: Set(true),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_owned(&self, user_id: &Uuid, id: &Uuid) -> DaoResult<Option<budget::Model>> {
        let (user_id, id) = (*user_id, *id);
        self.find_one(move |query| {
            query
                .filter(budget::Column::Id.eq(id))
                .filter(budget::Column::UserId.eq(user_id))
        })
        .await
    }

    pub async fn list_for_user(
        &self,
        user_id: &Uuid,
        is_active: Option<bool>,
    ) -> DaoResult<Vec<budget::Model>> {
        let user_id = *user_id;
        self.list(
            Some((budget::Column::StartDate, Order::Desc)),
            move |query| {
                let query = query.filter(budget::Column::UserId.eq(user_id));
                match is_active {
                    Some(flag) => query.filter(budget::Column::IsActive.eq(flag)),
                    None => query,
                }
            },
        )
        .await
    }

    /// Latest-starting active budget whose period contains `today`.
    pub async fn find_current(
        &self,
        user_id: &Uuid,
        today: NaiveDate,
    ) -> DaoResult<Option<budget::Model>> {
        let user_id = *user_id;
        self.find_one(move |query| {
            query
                .filter(budget::Column::UserId.eq(user_id))
                .filter(budget::Column::IsActive.eq(true))
                .filter(budget::Column::StartDate.lte(today))
                .filter(budget::Column::EndDate.gte(today))
                .order_by_desc(budget::Column::StartDate)
        })
        .await
    }

    pub async fn update_budget(&self, id: &Uuid, changes: BudgetChanges) -> DaoResult<budget::Model> {
        self.update(*id, move |active| {
            if let Some(amount) = changes.amount {
                active.amount = Set(amount);
            }
            if let Some(period_type) = changes.period_type {
                active.period_type = Set(period_type);
            }
            if let Some(start_date) = changes.start_date {
                active.start_date = Set(start_date);
            }
            if let Some(end_date) = changes.end_date {
                active.end_date = Set(end_date);
            }
            if let Some(is_active) = changes.is_active {
                active.is_active = Set(is_active);
            }
        })
        .await
    }

    pub async fn delete_budget(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}
