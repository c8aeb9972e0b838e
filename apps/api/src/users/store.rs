//! User rows and per-user statistics.

use serde::Serialize;
use sqlx::{FromRow, Result, SqlitePool};

use crate::models::user::UserRow;

/// Creates the user on first contact, touches `last_activity` otherwise.
/// Returns the current row either way.
pub async fn upsert_user(
    pool: &SqlitePool,
    telegram_user_id: &str,
    username: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<UserRow> {
    let existing = get_user(pool, telegram_user_id).await?;

    if existing.is_some() {
        sqlx::query(
            "UPDATE users SET last_activity = CURRENT_TIMESTAMP WHERE telegram_user_id = ?",
        )
        .bind(telegram_user_id)
        .execute(pool)
        .await?;
    } else {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_user_id, username, first_name, last_name)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(telegram_user_id)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .execute(pool)
        .await?;
    }

    get_user(pool, telegram_user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_user(pool: &SqlitePool, telegram_user_id: &str) -> Result<Option<UserRow>> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE telegram_user_id = ?")
            .bind(telegram_user_id)
            .fetch_optional(pool)
            .await?,
    )
}

#[derive(Debug, Serialize, FromRow)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MonthCount {
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_entries: i64,
    pub entries_by_source: Vec<SourceCount>,
    pub monthly_entries: Vec<MonthCount>,
    pub total_images: i64,
}

/// Entry counts by source and by month (last 6 months), plus the total
/// image count across the user's entries.
pub async fn user_stats(pool: &SqlitePool, owner_id: &str) -> Result<UserStats> {
    let total_entries: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM journal_entries WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

    let entries_by_source = sqlx::query_as::<_, SourceCount>(
        r#"
        SELECT source, COUNT(*) as count
        FROM journal_entries
        WHERE owner_id = ?
        GROUP BY source
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let monthly_entries = sqlx::query_as::<_, MonthCount>(
        r#"
        SELECT strftime('%Y-%m', date) as month, COUNT(*) as count
        FROM journal_entries
        WHERE owner_id = ?
          AND date >= date('now', '-6 months')
        GROUP BY month
        ORDER BY month DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let total_images: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM entry_images ei
        JOIN journal_entries je ON ei.entry_id = je.id
        WHERE je.owner_id = ?
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        total_entries,
        entries_by_source,
        monthly_entries,
        total_images,
    })
}
