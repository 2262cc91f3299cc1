use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::{
        BudgetDao, ExpenseDao,
        budget_dao::{BudgetChanges, NewBudget},
    },
    db::entities::budget,
    error::AppError,
    services::positive_amount,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
            Self::Custom => "CUSTOM",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub amount: f64,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub amount: Option<f64>,
    pub period_type: Option<PeriodType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub spent_amount: f64,
    pub remaining_amount: f64,
    pub percentage: f64,
    pub days_remaining: i64,
    pub is_over_budget: bool,
}

/// Spending against `budget` as of `today`. `percentage` is rounded to two
/// decimals; `days_remaining` never goes below zero.
pub fn budget_status(budget: &budget::Model, spent: f64, today: NaiveDate) -> BudgetStatus {
    let percentage = if budget.amount > 0.0 {
        (spent / budget.amount * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    };

    BudgetStatus {
        spent_amount: spent,
        remaining_amount: budget.amount - spent,
        percentage,
        days_remaining: (budget.end_date - today).num_days().max(0),
        is_over_budget: spent > budget.amount,
    }
}

fn check_period(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::bad_request(
            "End date must be on or after start date",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BudgetService {
    budget_dao: BudgetDao,
    expense_dao: ExpenseDao,
}

impl BudgetService {
    pub fn new(budget_dao: BudgetDao, expense_dao: ExpenseDao) -> Self {
        Self {
            budget_dao,
            expense_dao,
        }
    }

    pub async fn create(&self, user_id: &Uuid, input: BudgetInput) -> Result<budget::Model, AppError> {
        let amount = positive_amount(input.amount)?;
        check_period(input.start_date, input.end_date)?;

        Ok(self
            .budget_dao
            .create_budget(
                user_id,
                NewBudget {
                    amount,
                    period_type: input.period_type.as_str().to_string(),
                    start_date: input.start_date,
                    end_date: input.end_date,
                },
            )
            .await?)
    }

    pub async fn list(
        &self,
        user_id: &Uuid,
        is_active: Option<bool>,
    ) -> Result<Vec<budget::Model>, AppError> {
        Ok(self.budget_dao.list_for_user(user_id, is_active).await?)
    }

    pub async fn require(&self, user_id: &Uuid, id: &Uuid) -> Result<budget::Model, AppError> {
        self.budget_dao
            .find_owned(user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Budget not found"))
    }

    /// The active budget covering `today`, with its status.
    pub async fn current(
        &self,
        user_id: &Uuid,
        today: NaiveDate,
    ) -> Result<Option<(budget::Model, BudgetStatus)>, AppError> {
        let Some(budget) = self.budget_dao.find_current(user_id, today).await? else {
            return Ok(None);
        };
        let status = self.status_of(&budget, today).await?;
        Ok(Some((budget, status)))
    }

    pub async fn status(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        today: NaiveDate,
    ) -> Result<BudgetStatus, AppError> {
        let budget = self.require(user_id, id).await?;
        self.status_of(&budget, today).await
    }

    pub async fn update(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        update: BudgetUpdate,
    ) -> Result<budget::Model, AppError> {
        let current = self.require(user_id, id).await?;
        let amount = update.amount.map(positive_amount).transpose()?;
        check_period(
            update.start_date.unwrap_or(current.start_date),
            update.end_date.unwrap_or(current.end_date),
        )?;

        Ok(self
            .budget_dao
            .update_budget(
                id,
                BudgetChanges {
                    amount,
                    period_type: update.period_type.map(|p| p.as_str().to_string()),
                    start_date: update.start_date,
                    end_date: update.end_date,
                    is_active: update.is_active,
                },
            )
            .await?)
    }

    pub async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<(), AppError> {
        self.require(user_id, id).await?;
        self.budget_dao.delete_budget(id).await?;
        Ok(())
    }

    async fn status_of(&self, budget: &budget::Model, today: NaiveDate) -> Result<BudgetStatus, AppError> {
        let spent = self
            .expense_dao
            .total_between(&budget.user_id, budget.start_date, budget.end_date)
            .await?;
        Ok(budget_status(budget, spent, today))
    }
}
