use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::FixedOffset;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    /// Base URL of the Mini App, used to build entry deep links.
    pub mini_app_url: String,
    /// Root of the on-disk media tree (voice temp files, `images/` subtree).
    pub upload_dir: PathBuf,
    /// UTC offset used to stamp the `date` of voice entries.
    pub entry_tz_offset: FixedOffset,
    /// Public URL registered as the Telegram webhook at startup, if set.
    pub webhook_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/journal.db?mode=rwc".to_string()),
            telegram_bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            mini_app_url: std::env::var("MINI_APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            entry_tz_offset: std::env::var("ENTRY_TZ_OFFSET")
                .unwrap_or_else(|_| "+01:00".to_string())
                .parse::<FixedOffset>()
                .context("ENTRY_TZ_OFFSET must be a UTC offset like +01:00")?,
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    #[test]
    fn default_offset_parses() {
        let offset: FixedOffset = "+01:00".parse().unwrap();
        assert_eq!(offset.local_minus_utc(), 3600);
    }

    #[test]
    fn negative_offset_parses() {
        let offset: FixedOffset = "-03:30".parse().unwrap();
        assert_eq!(offset.local_minus_utc(), -(3 * 3600 + 1800));
    }
}
