pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 3000;
pub const RUST_LOG: &str = "info,tower_http=info";

pub fn db_max_connections() -> u32 {
    10
}

pub fn db_min_idle() -> u32 {
    2
}

/// Fifteen minutes.
pub fn access_ttl_secs() -> u64 {
    15 * 60
}

pub fn refresh_ttl_days() -> i64 {
    7
}

/// Longest lifetimes accepted for issued tokens.
pub const MAX_ACCESS_TTL_SECS: u64 = 24 * 60 * 60;
pub const MAX_REFRESH_TTL_DAYS: i64 = 365;
