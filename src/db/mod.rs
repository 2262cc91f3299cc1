pub mod connection;
pub mod dao;
pub mod entities;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod providers;
