//! Row builders shared by the mock-database tests.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use sea_orm::{MockExecResult, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::db::entities::{budget, category, expense, refresh_token, user};

/// 2026-01-01T00:00:00Z
pub(crate) fn stamp() -> DateTimeWithTimeZone {
    FixedOffset::east_opt(0)
        .and_then(|utc| utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single())
        .expect("fixed timestamp")
}

pub(crate) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).expect("valid 2026 date")
}

pub(crate) fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

/// Active user `<username>@x.com` whose hash is the literal `hash`.
pub(crate) fn user(username: &str) -> user::Model {
    user::Model {
        id: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
        email: format!("{username}@x.com"),
        username: username.to_string(),
        password_hash: "hash".to_string(),
        is_active: true,
    }
}

pub(crate) fn category(user_id: Uuid, name: &str) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
        user_id,
        name: name.to_string(),
        icon: None,
        color: Some("#FF6B6B".to_string()),
    }
}

pub(crate) fn expense(user_id: Uuid, category_id: Uuid, on: NaiveDate) -> expense::Model {
    expense::Model {
        id: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
        user_id,
        category_id,
        name: "Lunch".to_string(),
        amount: 15.5,
        date: on,
        notes: None,
    }
}

/// Active monthly budget of 500 covering January 2026.
pub(crate) fn budget(user_id: Uuid) -> budget::Model {
    budget::Model {
        id: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
        user_id,
        amount: 500.0,
        period_type: "MONTHLY".to_string(),
        start_date: date(1, 1),
        end_date: date(1, 31),
        is_active: true,
    }
}

pub(crate) fn refresh_record(
    user_id: Uuid,
    token: &str,
    expires_at: DateTimeWithTimeZone,
) -> refresh_token::Model {
    refresh_token::Model {
        id: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
        token: token.to_string(),
        user_id,
        expires_at,
    }
}
