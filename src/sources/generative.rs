use crate::core::matcher::TermMatcher;
use crate::domain::model::{Exercise, ExerciseOrigin, SearchPattern};
use crate::domain::ports::ExerciseSource;
use crate::utils::error::{Result, TrainerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You write short example sentences for Spanish speakers learning English verb tenses. \
Reply with a JSON object only: {\"english\": \"...\", \"spanish\": \"...\"}.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct GeneratedSentence {
    english: String,
    spanish: String,
}

/// Asks an OpenAI-compatible chat-completions endpoint for a sentence that
/// uses the exact conjugated form.
#[derive(Debug, Clone)]
pub struct GenerativeSource {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    temperature: f32,
}

impl GenerativeSource {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            timeout,
            temperature: 0.8,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn prompt(pattern: &SearchPattern) -> String {
        format!(
            "Write one natural, everyday English sentence (under 15 words) that contains the exact words \"{}\" \
             ({} of \"{}\"), and its Spanish translation.",
            pattern.term,
            pattern.tense,
            pattern.verb
        )
    }

    fn build_exercise(&self, pattern: &SearchPattern, content: &str) -> Result<Option<Exercise>> {
        let generated: GeneratedSentence = match serde_json::from_str(strip_code_fence(content)) {
            Ok(sentence) => sentence,
            Err(e) => {
                tracing::debug!("generative: unparsable reply ({}): {}", e, content);
                return Ok(None);
            }
        };

        let matcher = TermMatcher::new(&pattern.term)?;
        let Some(split) = matcher.split(generated.english.trim()) else {
            tracing::debug!(
                "generative: '{}' missing from '{}'",
                pattern.term,
                generated.english
            );
            return Ok(None);
        };
        if generated.spanish.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(Exercise {
            id: ExerciseOrigin::Generative.new_exercise_id(),
            verb: pattern.verb.clone(),
            spanish_verb: pattern.spanish_verb.clone(),
            tense: pattern.tense,
            parts: split.parts,
            spanish_sentence: generated.spanish.trim().to_string(),
            answer: split.matched,
            hint: format!("The answer is '{}' (Generated sentence)", pattern.term),
            origin: ExerciseOrigin::Generative,
        }))
    }
}

/// Models like to wrap JSON in ```json fences.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl ExerciseSource for GenerativeSource {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn fetch(&self, pattern: &SearchPattern) -> Result<Option<Exercise>> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::prompt(pattern),
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("🤖 generative: asking {} for '{}'", self.model, pattern.term);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!("⏱️ generative: request for '{}' timed out", pattern.term);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Err(TrainerError::SourceUnavailable {
                source_name: self.name().to_string(),
                message: format!("status {}", response.status()),
            });
        }

        let reply: ChatResponse = match response.json().await {
            Ok(reply) => reply,
            Err(e) if e.is_timeout() => {
                tracing::warn!("⏱️ generative: reply for '{}' timed out", pattern.term);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let Some(choice) = reply.choices.first() else {
            return Ok(None);
        };

        self.build_exercise(pattern, &choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Tense;

    fn source() -> GenerativeSource {
        GenerativeSource::new("http://localhost/v1/chat/completions", "test-model", Duration::from_secs(5))
    }

    fn pattern() -> SearchPattern {
        SearchPattern {
            term: "had eaten".to_string(),
            verb: "To Eat".to_string(),
            spanish_verb: "Comer".to_string(),
            tense: Tense::PastPerfect,
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {} "), "{}");
    }

    #[test]
    fn test_build_exercise_from_reply() {
        let content = r#"{"english": "We had eaten before the movie.", "spanish": "Habíamos comido antes de la película."}"#;
        let exercise = source().build_exercise(&pattern(), content).unwrap().unwrap();

        assert_eq!(exercise.answer, "had eaten");
        assert_eq!(exercise.parts.before, "We ");
        assert_eq!(exercise.origin, ExerciseOrigin::Generative);
        assert!(exercise.origin.is_generated());
    }

    #[test]
    fn test_reply_without_term_is_rejected() {
        let content = r#"{"english": "We ate before the movie.", "spanish": "Comimos antes."}"#;
        assert!(source().build_exercise(&pattern(), content).unwrap().is_none());
        assert!(source().build_exercise(&pattern(), "not json").unwrap().is_none());
    }

    #[test]
    fn test_prompt_names_the_form() {
        let prompt = GenerativeSource::prompt(&pattern());
        assert!(prompt.contains("\"had eaten\""));
        assert!(prompt.contains("Past Perfect"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let source = source().with_api_key(Some("  ".to_string()));
        assert!(source.api_key.is_none());
    }
}
