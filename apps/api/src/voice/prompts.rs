//! Prompts for the transcript summarization step.

pub const SUMMARY_SYSTEM: &str = "Ты помощник психолога, который анализирует \
терапевтические сессии и создает структурированные резюме.";

/// `{transcript}` is substituted with the raw transcript text.
pub const SUMMARY_PROMPT: &str = r#"Проанализируй следующую терапевтическую сессию и создай структурированное резюме в формате JSON:

Транскрипт: "{transcript}"

Создай JSON с полями:
{
  "title": "Краткий заголовок сессии (1-2 слова)",
  "summary": "Краткое резюме основных моментов (2-3 предложения)",
  "key_topics": ["список", "основных", "тем"],
  "emotions": ["эмоции", "которые", "проявлялись"],
  "insights": "Важные инсайты или выводы",
  "next_steps": "Рекомендации для следующих шагов"
}

Отвечай только JSON без дополнительного текста."#;
