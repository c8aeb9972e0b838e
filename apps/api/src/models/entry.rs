use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Provenance of a journal entry: created by hand in the Mini App, or
/// derived from a voice message by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EntrySource {
    Manual,
    Voice,
}

/// One journal entry row. `date` is the session date chosen by the user
/// (or stamped by the voice pipeline), not the creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EntryRow {
    pub id: i64,
    pub owner_id: String,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub transcript: Option<String>,
    pub content: Option<String>,
    /// Comma-separated, unnormalized. Split/trim/dedupe lives in
    /// `journal::grouping` only.
    pub tags: Option<String>,
    /// Serialized structured payload from the summarization step.
    pub raw_analysis: Option<String>,
    pub source: EntrySource,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
