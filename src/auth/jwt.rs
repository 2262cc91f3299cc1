use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use super::{TokenClaims, TokenPair};
use crate::{config::AuthConfig, db::entities::user, error::AppError};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &TokenClaims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

/// Verifies signature and expiry with no leeway.
pub fn decode_token(
    keys: &JwtKeys,
    token: &str,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<TokenClaims>(token, &keys.dec, &validation).map(|data| data.claims)
}

pub fn make_claims(user: &user::Model, issued_at: DateTime<Utc>, ttl: Duration) -> TokenClaims {
    TokenClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        iat: unix(issued_at),
        exp: unix(issued_at + ttl),
        jti: Uuid::new_v4().to_string(),
    }
}

fn unix(at: DateTime<Utc>) -> usize {
    at.timestamp().max(0) as usize
}

fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AppError> {
    issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::internal("Token lifetime out of range"))
}

#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub pair: TokenPair,
    pub refresh_expires_at: DateTimeWithTimeZone,
}

/// Mints access and refresh tokens. Each kind has its own secret so one can
/// never be replayed as the other.
#[derive(Clone)]
pub struct TokenIssuer {
    access: JwtKeys,
    refresh: JwtKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl_secs: u64,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            access: JwtKeys::from_secret(access_secret),
            refresh: JwtKeys::from_secret(refresh_secret),
            access_ttl: i64::try_from(access_ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            refresh_ttl: Duration::try_days(refresh_ttl_days).unwrap_or(Duration::MAX),
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(
            cfg.access_secret.as_bytes(),
            cfg.refresh_secret.as_bytes(),
            cfg.access_ttl_secs,
            cfg.refresh_ttl_days,
        )
    }

    pub fn issue(&self, user: &user::Model) -> Result<IssuedTokens, AppError> {
        let now = Utc::now();
        let refresh_expires_at = expiry(now, self.refresh_ttl)?;
        expiry(now, self.access_ttl)?;
        let access_token = encode_token(&self.access, &make_claims(user, now, self.access_ttl))?;
        let refresh_token =
            encode_token(&self.refresh, &make_claims(user, now, self.refresh_ttl))?;

        Ok(IssuedTokens {
            pair: TokenPair {
                access_token,
                refresh_token,
            },
            refresh_expires_at: refresh_expires_at.fixed_offset(),
        })
    }

    pub fn decode_access(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        decode_token(&self.access, token)
    }

    pub fn decode_refresh(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        decode_token(&self.refresh, token)
    }
}
