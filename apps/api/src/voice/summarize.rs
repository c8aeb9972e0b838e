//! Transcript analysis with a degraded fallback.
//!
//! Summarization is a soft dependency of the pipeline: any failure to
//! obtain or parse the structured payload substitutes the fallback so the
//! persistence step always has usable input. Transcription, by contrast,
//! is hard — see `voice::transcribe`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::LlmClient;
use crate::voice::prompts::{SUMMARY_PROMPT, SUMMARY_SYSTEM};

const FALLBACK_TITLE: &str = "Терапевтическая сессия";
const FALLBACK_SUMMARY_CHARS: usize = 200;

/// The structured payload produced by the summarization step.
/// Serialized verbatim into the entry's `raw_analysis` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub next_steps: String,
}

impl SessionAnalysis {
    /// Comma-joined topics, the value stored in the entry's `tags` field.
    pub fn tags(&self) -> String {
        self.key_topics.join(", ")
    }
}

/// Asks the model for a structured summary of the transcript. Never
/// fails: any error on the way to a parsed payload yields the fallback.
pub async fn analyze_transcript(llm: &LlmClient, transcript: &str) -> SessionAnalysis {
    let prompt = SUMMARY_PROMPT.replace("{transcript}", transcript);

    match llm.call_json::<SessionAnalysis>(&prompt, SUMMARY_SYSTEM).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Summary generation failed, using fallback: {e}");
            fallback_analysis(transcript)
        }
    }
}

/// Degraded summary: generic title, leading slice of the transcript,
/// empty topic and emotion lists.
fn fallback_analysis(transcript: &str) -> SessionAnalysis {
    let mut summary: String = transcript.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    summary.push_str("...");

    SessionAnalysis {
        title: FALLBACK_TITLE.to_string(),
        summary,
        key_topics: Vec::new(),
        emotions: Vec::new(),
        insights: String::new(),
        next_steps: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_truncates_long_transcripts() {
        let transcript = "а".repeat(500);
        let analysis = fallback_analysis(&transcript);
        assert_eq!(analysis.title, FALLBACK_TITLE);
        assert_eq!(
            analysis.summary.chars().count(),
            FALLBACK_SUMMARY_CHARS + 3
        );
        assert!(analysis.summary.ends_with("..."));
        assert!(analysis.key_topics.is_empty());
        assert!(analysis.emotions.is_empty());
    }

    #[test]
    fn fallback_is_multibyte_safe() {
        // Cyrillic text: a byte-indexed slice at 200 would panic.
        let transcript = "Сегодня была тяжелая сессия. ".repeat(20);
        let analysis = fallback_analysis(&transcript);
        assert!(!analysis.summary.is_empty());
    }

    #[test]
    fn fallback_keeps_short_transcripts_whole() {
        let analysis = fallback_analysis("короткая запись");
        assert_eq!(analysis.summary, "короткая запись...");
    }

    #[test]
    fn payload_parses_with_missing_optional_fields() {
        let analysis: SessionAnalysis =
            serde_json::from_str(r#"{"title": "Сон", "summary": "О снах."}"#).unwrap();
        assert_eq!(analysis.title, "Сон");
        assert!(analysis.key_topics.is_empty());
        assert!(analysis.insights.is_empty());
    }

    #[test]
    fn tags_join_topics_with_comma() {
        let analysis = SessionAnalysis {
            title: "t".into(),
            summary: "s".into(),
            key_topics: vec!["сон".into(), "работа".into()],
            emotions: vec![],
            insights: String::new(),
            next_steps: String::new(),
        };
        assert_eq!(analysis.tags(), "сон, работа");
    }
}
