use std::sync::Arc;

use sqlx::SqlitePool;

use crate::bot::client::BotApi;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::voice::transcribe::SpeechToText;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Messaging client behind a trait so the pipeline never touches a
    /// concrete SDK.
    pub bot: Arc<dyn BotApi>,
    pub stt: SpeechToText,
    pub llm: LlmClient,
    /// Shared client for plain downloads (voice file fetch).
    pub http: reqwest::Client,
    pub config: Config,
}
