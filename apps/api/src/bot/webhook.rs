//! Telegram webhook ingress.
//!
//! Always answers 200, whatever happens inside: a non-200 would make
//! Telegram redeliver the update indefinitely. Failures are logged only.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::bot::messages;
use crate::bot::update::{Message, Update};
use crate::state::AppState;
use crate::users::store as users_store;
use crate::voice::pipeline;

/// POST /webhook
pub async fn handle_webhook(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring malformed webhook payload: {e}");
            return Json(json!({ "ok": true }));
        }
    };

    if let Some(message) = update.message {
        dispatch_message(&state, &message).await;
    }

    Json(json!({ "ok": true }))
}

async fn dispatch_message(state: &AppState, message: &Message) {
    touch_user(state, message).await;

    if message.voice.is_some() {
        pipeline::process_voice_message(state, message).await;
    } else if message.text.as_deref() == Some("/start") {
        let welcome = messages::welcome(&state.config.mini_app_url);
        if let Err(e) = state.bot.send_message(message.chat.id, &welcome).await {
            error!("Failed to send welcome message: {e:?}");
        }
    } else if let Err(e) = state
        .bot
        .send_message(message.chat.id, messages::TEXT_HINT)
        .await
    {
        error!("Failed to send hint message: {e:?}");
    }
}

/// Every bot interaction creates the user row if needed and touches
/// `last_activity`.
async fn touch_user(state: &AppState, message: &Message) {
    let Some(from) = &message.from else {
        return;
    };

    let result = users_store::upsert_user(
        &state.db,
        &from.id.to_string(),
        from.username.as_deref(),
        from.first_name.as_deref(),
        from.last_name.as_deref(),
    )
    .await;

    if let Err(e) = result {
        error!("Failed to upsert bot user {}: {e:?}", from.id);
    }
}
