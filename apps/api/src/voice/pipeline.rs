//! The voice-to-entry pipeline.
//!
//! One strictly sequential run per incoming voice message: download →
//! transcription → summarization → persistence → confirmation. Download
//! and transcription failures abort with a user-visible message and no
//! entry; summarization failure degrades to a fallback and continues.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::bot::messages;
use crate::bot::update::Message;
use crate::journal::store::{self, NewVoiceEntry};
use crate::state::AppState;
use crate::voice::summarize;

/// Entry point called by the webhook for every voice message. Never
/// returns an error: failures are reported to the user and logged.
pub async fn process_voice_message(state: &AppState, msg: &Message) {
    let chat_id = msg.chat.id;

    if let Err(e) = run_pipeline(state, msg).await {
        error!("Voice processing error: {e:?}");
        if let Err(send_err) = state.bot.send_message(chat_id, messages::VOICE_ERROR).await {
            error!("Failed to deliver error message to chat {chat_id}: {send_err:?}");
        }
    }
}

async fn run_pipeline(state: &AppState, msg: &Message) -> Result<()> {
    let voice = msg
        .voice
        .as_ref()
        .context("message has no voice attachment")?;
    let chat_id = msg.chat.id;
    let owner_id = msg
        .from
        .as_ref()
        .context("voice message without sender")?
        .id
        .to_string();

    info!("Processing voice message from user {owner_id} (file {})", voice.file_id);

    let status_id = state.bot.send_message(chat_id, messages::PROCESSING).await?;

    // 1. Resolve the download URL and persist the raw audio to a temp file.
    let file_url = state.bot.get_file_url(&voice.file_id).await?;
    let audio = state
        .http
        .get(&file_url)
        .send()
        .await
        .context("Failed to download voice file")?
        .error_for_status()
        .context("Voice file download rejected")?
        .bytes()
        .await
        .context("Failed to read voice file body")?;

    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let audio_path = state
        .config
        .upload_dir
        .join(format!("{}.ogg", Uuid::new_v4()));
    tokio::fs::write(&audio_path, &audio).await?;

    // 2. Transcription. Hard dependency: failure aborts, no entry.
    state
        .bot
        .edit_message(chat_id, status_id, messages::TRANSCRIBING)
        .await?;
    let transcript = state.stt.transcribe(&audio_path).await?;

    // 3. Summarization. Soft dependency: falls back internally, never fails.
    state
        .bot
        .edit_message(chat_id, status_id, messages::ANALYZING)
        .await?;
    let analysis = summarize::analyze_transcript(&state.llm, &transcript).await;

    // 4. Persist the entry, stamped with today's date in the configured
    //    reference offset (not the user's timezone).
    let date = Utc::now()
        .with_timezone(&state.config.entry_tz_offset)
        .date_naive();
    let tags = analysis.tags();
    let raw_analysis = serde_json::to_string(&analysis)?;

    let entry_id = store::insert_voice_entry(
        &state.db,
        NewVoiceEntry {
            owner_id: &owner_id,
            date,
            title: &analysis.title,
            summary: &analysis.summary,
            transcript: &transcript,
            tags: &tags,
            raw_analysis: &raw_analysis,
        },
    )
    .await?;

    // 5. Temp audio cleanup. Best-effort, never user-visible.
    if let Err(e) = tokio::fs::remove_file(&audio_path).await {
        warn!("Failed to remove temp audio {}: {e}", audio_path.display());
    }

    // 6. Confirmation with the deep link into the Mini App.
    let deep_link = format!("{}/entry/{}", state.config.mini_app_url, entry_id);
    let date_text = date.format("%d.%m.%Y").to_string();
    state
        .bot
        .edit_message(
            chat_id,
            status_id,
            &messages::entry_created(&date_text, &analysis.title, &deep_link),
        )
        .await?;

    info!("Created voice entry {entry_id} for user {owner_id}");
    Ok(())
}
