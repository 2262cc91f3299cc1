use sea_orm::DatabaseConnection;

use super::{BudgetDao, CategoryDao, DaoBase, ExpenseDao, RefreshTokenDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn category(&self) -> CategoryDao {
        DaoBase::new(&self.db)
    }

    pub fn expense(&self) -> ExpenseDao {
        DaoBase::new(&self.db)
    }

    pub fn budget(&self) -> BudgetDao {
        DaoBase::new(&self.db)
    }
}
