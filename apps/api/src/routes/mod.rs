pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::bot::webhook;
use crate::journal::handlers as journal;
use crate::state::AppState;
use crate::users::handlers as users;

/// Whole-request cap for multipart uploads: 5 files at 5MB plus form
/// overhead. Per-file limits are enforced in `journal::images`.
const UPLOAD_BODY_LIMIT: usize = 30 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.config.upload_dir.clone();

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Journal API
        .route("/entries/:user_id", get(journal::handle_list_entries))
        .route("/entry", post(journal::handle_create_entry))
        .route(
            "/entry/:id",
            get(journal::handle_get_entry)
                .put(journal::handle_update_entry)
                .delete(journal::handle_delete_entry),
        )
        .route("/entry/:id/images", post(journal::handle_upload_images))
        .route("/image/:image_id", delete(journal::handle_delete_image))
        .route("/tags/:user_id", get(journal::handle_get_tags))
        // Users
        .route("/user", post(users::handle_upsert_user))
        .route("/user/:user_id", get(users::handle_get_user))
        .route("/stats/:user_id", get(users::handle_get_stats))
        // Telegram ingress
        .route("/webhook", post(webhook::handle_webhook))
        // Uploaded images, served by relative path
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}
