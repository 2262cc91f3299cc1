#[allow(unused_imports)]
pub mod prelude {
    pub use super::budget::Entity as Budget;
    pub use super::category::Entity as Category;
    pub use super::expense::Entity as Expense;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::user::Entity as User;
}

pub mod budget;
pub mod category;
pub mod expense;
pub mod refresh_token;
pub mod user;
