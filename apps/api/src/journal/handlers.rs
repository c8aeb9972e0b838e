use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::journal::grouping;
use crate::journal::images;
use crate::journal::store::{self, EntryFilter, EntryUpdate, NewEntry};
use crate::state::AppState;

/// Query string of GET /entries/{userId}. Values arrive as raw strings:
/// the Mini App sends empty parameters for unused filters, which must be
/// treated as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tag: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Некорректная дата: {value}")))
}

impl ListQuery {
    fn into_filter(self) -> Result<EntryFilter, AppError> {
        let start_date = non_empty(self.start_date)
            .map(|v| parse_date(&v))
            .transpose()?;
        let end_date = non_empty(self.end_date)
            .map(|v| parse_date(&v))
            .transpose()?;

        Ok(EntryFilter {
            search: non_empty(self.search),
            start_date,
            end_date,
            tag: non_empty(self.tag),
        })
    }
}

/// GET /entries/{userId}
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query.into_filter()?;
    let entries = store::list_entries(&state.db, &user_id, &filter).await?;
    let grouped = grouping::group_by_month(entries);

    Ok(Json(json!({ "entries": grouped })))
}

/// GET /entry/{id}
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let entry = store::get_entry(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Запись не найдена".to_string()))?;
    let images = store::list_images(&state.db, id).await?;

    Ok(Json(json!({ "entry": entry, "images": images })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub owner_id: String,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// POST /entry
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let id = store::insert_entry(
        &state.db,
        NewEntry {
            owner_id: &req.owner_id,
            date: req.date,
            title: req.title.as_deref(),
            summary: req.summary.as_deref(),
            content: req.content.as_deref(),
            tags: req.tags.as_deref(),
        },
    )
    .await?;

    Ok(Json(json!({ "id": id, "message": "Запись создана успешно" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub date: NaiveDate,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// PUT /entry/{id}
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let updated = store::update_entry(
        &state.db,
        id,
        EntryUpdate {
            date: req.date,
            title: req.title.as_deref(),
            summary: req.summary.as_deref(),
            content: req.content.as_deref(),
            tags: req.tags.as_deref(),
        },
    )
    .await?;

    if updated == 0 {
        return Err(AppError::NotFound("Запись не найдена".to_string()));
    }

    Ok(Json(json!({ "message": "Запись обновлена успешно" })))
}

/// DELETE /entry/{id}
///
/// Two-step cleanup: backing image files first (best-effort), then the
/// entry row; image rows cascade with it. A crash in between can orphan
/// rows or files — the store gives no cross-statement atomicity.
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let paths = store::image_paths(&state.db, id).await?;
    for path in &paths {
        images::remove_media_file(&state.config.upload_dir, path).await;
    }

    let deleted = store::delete_entry(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Запись не найдена".to_string()));
    }

    info!("Deleted entry {id} and {} image file(s)", paths.len());
    Ok(Json(json!({ "message": "Запись удалена успешно" })))
}

/// POST /entry/{id}/images
pub async fn handle_upload_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    store::get_entry(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Запись не найдена".to_string()))?;

    let pending = images::collect_images(&mut multipart).await?;
    let stored = images::persist_images(&state.config.upload_dir, pending).await?;

    let count = stored.len();
    for image in &stored {
        store::insert_image(
            &state.db,
            id,
            &image.file_path,
            &image.file_name,
            image.file_size,
            &image.mime_type,
        )
        .await?;
    }

    Ok(Json(json!({
        "count": count,
        "message": format!("{count} изображений загружено успешно")
    })))
}

/// DELETE /image/{imageId}
pub async fn handle_delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let image = store::get_image(&state.db, image_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Изображение не найдено".to_string()))?;

    images::remove_media_file(&state.config.upload_dir, &image.file_path).await;
    store::delete_image(&state.db, image_id).await?;

    Ok(Json(json!({ "message": "Изображение удалено успешно" })))
}

/// GET /tags/{userId}
pub async fn handle_get_tags(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let fields = store::tag_fields(&state.db, &user_id).await?;
    let tags = grouping::distinct_tags(fields);

    Ok(Json(json!({ "tags": tags })))
}
