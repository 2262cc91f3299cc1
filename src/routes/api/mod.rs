pub mod auth;
pub mod budgets;
pub mod categories;
pub mod expenses;
mod router;
pub mod users;

pub use router::router;
