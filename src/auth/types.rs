use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by both access and refresh tokens. `jti` keeps two tokens
/// minted for the same user within one second distinct.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String, // user id
    pub email: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity resolved from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
}

/// Identity resolved from a valid refresh token, with the token itself so the
/// handler can rotate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPrincipal {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub refresh_token: String,
}
