//! All SQL for journal entries and their images. Each statement is its own
//! atomic unit; there are no multi-statement transactions (file cleanup and
//! row deletion are separate steps by design of the storage contract).

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Result, Sqlite, SqlitePool};

use crate::models::entry::{EntryRow, EntrySource};
use crate::models::image::ImageRow;

/// Fields for a manually created entry.
pub struct NewEntry<'a> {
    pub owner_id: &'a str,
    pub date: NaiveDate,
    pub title: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub content: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Fields for an entry produced by the voice pipeline.
pub struct NewVoiceEntry<'a> {
    pub owner_id: &'a str,
    pub date: NaiveDate,
    pub title: &'a str,
    pub summary: &'a str,
    pub transcript: &'a str,
    pub tags: &'a str,
    pub raw_analysis: &'a str,
}

/// Partial update applied by `PUT /entry/{id}`. `owner_id`, `transcript`,
/// `raw_analysis` and `source` are never client-writable.
pub struct EntryUpdate<'a> {
    pub date: NaiveDate,
    pub title: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub content: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Optional list filters; all supplied filters must match.
/// The date range applies only when both bounds are present.
#[derive(Debug, Default)]
pub struct EntryFilter {
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tag: Option<String>,
}

pub async fn insert_entry(pool: &SqlitePool, entry: NewEntry<'_>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO journal_entries
            (owner_id, date, title, summary, content, tags, source)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.owner_id)
    .bind(entry.date)
    .bind(entry.title)
    .bind(entry.summary)
    .bind(entry.content)
    .bind(entry.tags)
    .bind(EntrySource::Manual)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_voice_entry(pool: &SqlitePool, entry: NewVoiceEntry<'_>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO journal_entries
            (owner_id, date, title, summary, transcript, tags, raw_analysis, source)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.owner_id)
    .bind(entry.date)
    .bind(entry.title)
    .bind(entry.summary)
    .bind(entry.transcript)
    .bind(entry.tags)
    .bind(entry.raw_analysis)
    .bind(EntrySource::Voice)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_entry(pool: &SqlitePool, id: i64) -> Result<Option<EntryRow>> {
    Ok(
        sqlx::query_as::<_, EntryRow>("SELECT * FROM journal_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Returns the number of rows updated (0 when the id is unknown).
/// Touches `updated_at` on every call.
pub async fn update_entry(pool: &SqlitePool, id: i64, update: EntryUpdate<'_>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE journal_entries
        SET date = ?, title = ?, summary = ?, content = ?, tags = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(update.date)
    .bind(update.title)
    .bind(update.summary)
    .bind(update.content)
    .bind(update.tags)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Deletes the entry row; image rows cascade via the foreign key.
/// Backing files must already be removed by the caller.
pub async fn delete_entry(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM journal_entries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Filtered row-set for one owner, most recent date first, creation time
/// descending as tiebreaker. Search is a substring match over title,
/// summary and transcript; the tag filter is a substring match over the
/// raw tags field, so "art" also matches "party".
pub async fn list_entries(
    pool: &SqlitePool,
    owner_id: &str,
    filter: &EntryFilter,
) -> Result<Vec<EntryRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM journal_entries WHERE owner_id = ");
    qb.push_bind(owner_id);

    if let Some(search) = filter.search.as_deref() {
        let pattern = format!("%{search}%");
        qb.push(" AND (title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR summary LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR transcript LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        qb.push(" AND date BETWEEN ");
        qb.push_bind(start);
        qb.push(" AND ");
        qb.push_bind(end);
    }

    if let Some(tag) = filter.tag.as_deref() {
        qb.push(" AND tags LIKE ");
        qb.push_bind(format!("%{tag}%"));
    }

    qb.push(" ORDER BY date DESC, created_at DESC");

    Ok(qb.build_query_as::<EntryRow>().fetch_all(pool).await?)
}

/// Raw tags fields for one owner, feeding `grouping::distinct_tags`.
pub async fn tag_fields(pool: &SqlitePool, owner_id: &str) -> Result<Vec<String>> {
    Ok(sqlx::query_scalar(
        "SELECT tags FROM journal_entries WHERE owner_id = ? AND tags IS NOT NULL AND tags != ''",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_images(pool: &SqlitePool, entry_id: i64) -> Result<Vec<ImageRow>> {
    Ok(sqlx::query_as::<_, ImageRow>(
        "SELECT * FROM entry_images WHERE entry_id = ? ORDER BY created_at",
    )
    .bind(entry_id)
    .fetch_all(pool)
    .await?)
}

/// Relative paths of all image files owned by an entry, for pre-delete
/// file cleanup.
pub async fn image_paths(pool: &SqlitePool, entry_id: i64) -> Result<Vec<String>> {
    Ok(
        sqlx::query_scalar("SELECT file_path FROM entry_images WHERE entry_id = ?")
            .bind(entry_id)
            .fetch_all(pool)
            .await?,
    )
}

pub async fn insert_image(
    pool: &SqlitePool,
    entry_id: i64,
    file_path: &str,
    file_name: &str,
    file_size: i64,
    mime_type: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO entry_images
            (entry_id, file_path, file_name, file_size, mime_type)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry_id)
    .bind(file_path)
    .bind(file_name)
    .bind(file_size)
    .bind(mime_type)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_image(pool: &SqlitePool, id: i64) -> Result<Option<ImageRow>> {
    Ok(
        sqlx::query_as::<_, ImageRow>("SELECT * FROM entry_images WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn delete_image(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM entry_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
