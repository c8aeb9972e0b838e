use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::bot::client::{BotApi, TelegramBot};
use api::config::Config;
use api::db::{create_pool, init_schema};
use api::llm_client::LlmClient;
use api::routes::build_router;
use api::state::AppState;
use api::voice::transcribe::SpeechToText;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Journal API v{}", env!("CARGO_PKG_VERSION"));

    // The media tree and the database directory must exist before first use
    tokio::fs::create_dir_all(config.upload_dir.join("images")).await?;
    ensure_database_dir(&config.database_url).await?;

    // Initialize SQLite
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the Telegram bot and register the webhook if configured
    let telegram = TelegramBot::new(config.telegram_bot_token.clone());
    if let Some(webhook_url) = &config.webhook_url {
        let url = format!("{webhook_url}/webhook");
        match telegram.set_webhook(&url).await {
            Ok(()) => info!("Telegram webhook registered at {url}"),
            Err(e) => error!("Failed to register Telegram webhook: {e:?}"),
        }
    }
    let bot: Arc<dyn BotApi> = Arc::new(telegram);

    // Initialize the speech and LLM clients
    let stt = SpeechToText::new(config.openai_api_key.clone());
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", api::llm_client::MODEL);

    // Build app state
    let state = AppState {
        db,
        bot,
        stt,
        llm,
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the Mini App is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Mini App base URL: {}", config.mini_app_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `create_if_missing` creates the database file but not its parent
/// directory; create it here for file-backed URLs.
async fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
