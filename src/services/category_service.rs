use uuid::Uuid;

use crate::{
    db::dao::{CategoryDao, ExpenseDao, category_dao::CategoryChanges},
    db::entities::category,
    error::AppError,
    services::{conflict_on_unique, required_text},
};

const NAME_TAKEN: &str = "Category with this name already exists";

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    category_dao: CategoryDao,
    expense_dao: ExpenseDao,
}

impl CategoryService {
    pub fn new(category_dao: CategoryDao, expense_dao: ExpenseDao) -> Self {
        Self {
            category_dao,
            expense_dao,
        }
    }

    pub async fn create(&self, user_id: &Uuid, data: NewCategory) -> Result<category::Model, AppError> {
        let name = required_text(&data.name, "Name")?;
        if self.category_dao.find_by_name(user_id, &name).await?.is_some() {
            return Err(AppError::conflict(NAME_TAKEN));
        }

        self.category_dao
            .create_category(user_id, &name, data.icon, data.color)
            .await
            .map_err(|err| conflict_on_unique(err, NAME_TAKEN))
    }

    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<category::Model>, AppError> {
        Ok(self.category_dao.list_for_user(user_id).await?)
    }

    /// Categories of other users are reported as missing.
    pub async fn require(&self, user_id: &Uuid, id: &Uuid) -> Result<category::Model, AppError> {
        self.category_dao
            .find_owned(user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    pub async fn update(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        mut changes: CategoryChanges,
    ) -> Result<category::Model, AppError> {
        let current = self.require(user_id, id).await?;

        if let Some(raw) = changes.name.take() {
            let name = required_text(&raw, "Name")?;
            if name != current.name {
                if let Some(other) = self.category_dao.find_by_name(user_id, &name).await? {
                    if other.id != current.id {
                        return Err(AppError::conflict(NAME_TAKEN));
                    }
                }
                changes.name = Some(name);
            }
        }

        self.category_dao
            .update_category(id, changes)
            .await
            .map_err(|err| conflict_on_unique(err, NAME_TAKEN))
    }

    pub async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<(), AppError> {
        self.require(user_id, id).await?;
        if self.expense_dao.count_by_category(id).await? > 0 {
            return Err(AppError::conflict(
                "Category is used by existing expenses and cannot be deleted",
            ));
        }
        self.category_dao.delete_category(id).await?;
        Ok(())
    }
}
