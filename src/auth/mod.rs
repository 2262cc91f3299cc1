pub mod jwt;
pub mod password;
pub mod strategy;
mod types;

pub use strategy::{AccessTokenValidator, Authenticator, RefreshTokenValidator};
pub use types::{Principal, RefreshPrincipal, TokenClaims, TokenPair};
