use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::dao::{
        CategoryDao, ExpenseDao,
        expense_dao::{ExpenseChanges, ExpenseFilter, NewExpense},
    },
    db::entities::{category, expense},
    error::AppError,
    services::{positive_amount, required_text},
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;
pub const DEFAULT_RECENT_LIMIT: u64 = 5;
pub const MAX_RECENT_LIMIT: u64 = 50;

/// An expense with the category it is filed under.
#[derive(Debug, Clone)]
pub struct ExpenseDetails {
    pub expense: expense::Model,
    pub category: Option<category::Model>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub filter: ExpenseFilter,
}

#[derive(Debug, Clone)]
pub struct ExpensePage {
    pub expenses: Vec<ExpenseDetails>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

fn bounded(value: Option<u64>, default: u64, max: u64, field: &str) -> Result<u64, AppError> {
    let value = value.unwrap_or(default);
    if value == 0 || value > max {
        return Err(AppError::bad_request(format!(
            "{field} must be between 1 and {max}"
        )));
    }
    Ok(value)
}

pub(crate) fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit)
}

#[derive(Clone)]
pub struct ExpenseService {
    expense_dao: ExpenseDao,
    category_dao: CategoryDao,
}

impl ExpenseService {
    pub fn new(expense_dao: ExpenseDao, category_dao: CategoryDao) -> Self {
        Self {
            expense_dao,
            category_dao,
        }
    }

    pub async fn create(&self, user_id: &Uuid, data: NewExpense) -> Result<ExpenseDetails, AppError> {
        let data = NewExpense {
            name: required_text(&data.name, "Name")?,
            amount: positive_amount(data.amount)?,
            ..data
        };
        let category = self.owned_category(user_id, &data.category_id).await?;

        let expense = self.expense_dao.create_expense(user_id, data).await?;
        Ok(ExpenseDetails {
            expense,
            category: Some(category),
        })
    }

    pub async fn list(&self, user_id: &Uuid, query: ExpenseQuery) -> Result<ExpensePage, AppError> {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(AppError::bad_request("page must be at least 1"));
        }
        let limit = bounded(query.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, "limit")?;
        if let (Some(start), Some(end)) = (query.filter.start_date, query.filter.end_date) {
            if start > end {
                return Err(AppError::bad_request("startDate must not be after endDate"));
            }
        }

        let found = self
            .expense_dao
            .list_for_user(user_id, page, limit, &query.filter)
            .await?;
        let total = found.total;

        Ok(ExpensePage {
            expenses: self.with_categories(found.items).await?,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    pub async fn recent(
        &self,
        user_id: &Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ExpenseDetails>, AppError> {
        let limit = bounded(limit, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT, "limit")?;
        let expenses = self.expense_dao.recent(user_id, limit).await?;
        self.with_categories(expenses).await
    }

    pub async fn get(&self, user_id: &Uuid, id: &Uuid) -> Result<ExpenseDetails, AppError> {
        let expense = self.require(user_id, id).await?;
        let category = self.category_dao.find_owned(user_id, &expense.category_id).await?;
        Ok(ExpenseDetails { expense, category })
    }

    pub async fn update(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        changes: ExpenseChanges,
    ) -> Result<ExpenseDetails, AppError> {
        self.require(user_id, id).await?;

        let changes = ExpenseChanges {
            name: changes
                .name
                .map(|name| required_text(&name, "Name"))
                .transpose()?,
            amount: changes.amount.map(positive_amount).transpose()?,
            ..changes
        };
        if let Some(category_id) = &changes.category_id {
            self.owned_category(user_id, category_id).await?;
        }

        let expense = self.expense_dao.update_expense(id, changes).await?;
        let category = self.category_dao.find_owned(user_id, &expense.category_id).await?;
        Ok(ExpenseDetails { expense, category })
    }

    pub async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<(), AppError> {
        self.require(user_id, id).await?;
        self.expense_dao.delete_expense(id).await?;
        Ok(())
    }

    async fn require(&self, user_id: &Uuid, id: &Uuid) -> Result<expense::Model, AppError> {
        self.expense_dao
            .find_owned(user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Expense not found"))
    }

    async fn owned_category(
        &self,
        user_id: &Uuid,
        category_id: &Uuid,
    ) -> Result<category::Model, AppError> {
        self.category_dao
            .find_owned(user_id, category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    // One lookup for all categories referenced by the page.
    async fn with_categories(
        &self,
        expenses: Vec<expense::Model>,
    ) -> Result<Vec<ExpenseDetails>, AppError> {
        let mut ids: Vec<Uuid> = expenses.iter().map(|e| e.category_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let categories: HashMap<Uuid, category::Model> = self
            .category_dao
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(expenses
            .into_iter()
            .map(|expense| ExpenseDetails {
                category: categories.get(&expense.category_id).cloned(),
                expense,
            })
            .collect())
    }
}
