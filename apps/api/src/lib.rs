//! Voice journal backend: Telegram bot ingress, voice-to-entry pipeline,
//! and the HTTP API consumed by the Mini App web client.

pub mod bot;
pub mod config;
pub mod db;
pub mod errors;
pub mod journal;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod users;
pub mod voice;
