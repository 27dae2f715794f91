use crate::core::matcher::TermMatcher;
use crate::domain::model::{Exercise, ExerciseOrigin, SearchPattern};
use crate::domain::ports::ExerciseSource;
use crate::utils::error::{Result, TrainerError};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_CORPUS_ENDPOINT: &str = "https://tatoeba.org/eng/api_v0/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CorpusSentence>,
}

#[derive(Debug, Deserialize)]
struct CorpusSentence {
    text: String,
    #[serde(default)]
    translations: Vec<Vec<Translation>>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl CorpusSentence {
    fn first_translation(&self) -> Option<&str> {
        self.translations
            .first()
            .and_then(|group| group.first())
            .map(|t| t.text.as_str())
    }
}

/// Sentence-search corpus (Tatoeba API shape) queried for real English
/// sentences with Spanish translations.
#[derive(Debug, Clone)]
pub struct CorpusSource {
    client: Client,
    endpoint: String,
    proxies: Vec<String>,
    timeout: Duration,
    from_language: String,
    to_language: String,
}

impl CorpusSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            proxies: Vec::new(),
            timeout,
            from_language: "eng".to_string(),
            to_language: "spa".to_string(),
        }
    }

    /// Proxy URL templates tried in order; `{url}` receives the encoded search URL.
    pub fn with_proxies(mut self, proxies: Vec<String>) -> Self {
        self.proxies = proxies;
        self
    }

    pub fn with_languages(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_language = from.into();
        self.to_language = to.into();
        self
    }

    pub fn search_url(&self, term: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("from", self.from_language.as_str()),
                ("to", self.to_language.as_str()),
                ("query", term),
                ("trans_filter", "limit"),
                ("trans_to", self.to_language.as_str()),
                ("sort", "relevance"),
            ],
        )
        .map_err(|e| TrainerError::InvalidConfigValueError {
            field: "corpus.endpoint".to_string(),
            value: self.endpoint.clone(),
            reason: e.to_string(),
        })
    }

    /// Direct request when no proxies are configured, otherwise each proxy in turn.
    fn routes(&self, search_url: &Url) -> Vec<String> {
        if self.proxies.is_empty() {
            return vec![search_url.to_string()];
        }
        let encoded: String =
            url::form_urlencoded::byte_serialize(search_url.as_str().as_bytes()).collect();
        self.proxies
            .iter()
            .map(|template| template.replace("{url}", &encoded))
            .collect()
    }

    fn build_exercise(&self, pattern: &SearchPattern, response: SearchResponse) -> Result<Option<Exercise>> {
        let matcher = TermMatcher::new(&pattern.term)?;

        let valid: Vec<&CorpusSentence> = response
            .results
            .iter()
            .filter(|s| s.first_translation().is_some() && matcher.is_match(&s.text))
            .collect();

        tracing::debug!(
            "📚 corpus: {} of {} results usable for '{}'",
            valid.len(),
            response.results.len(),
            pattern.term
        );

        let Some(chosen) = valid.choose(&mut rand::thread_rng()) else {
            return Ok(None);
        };
        let Some(split) = matcher.split(&chosen.text) else {
            return Ok(None);
        };
        let spanish = chosen.first_translation().unwrap_or_default().to_string();

        Ok(Some(Exercise {
            id: ExerciseOrigin::Corpus.new_exercise_id(),
            verb: pattern.verb.clone(),
            spanish_verb: pattern.spanish_verb.clone(),
            tense: pattern.tense,
            parts: split.parts,
            spanish_sentence: spanish,
            answer: split.matched,
            hint: format!("The answer is '{}' (Fetched from Tatoeba)", pattern.term),
            origin: ExerciseOrigin::Corpus,
        }))
    }
}

#[async_trait]
impl ExerciseSource for CorpusSource {
    fn name(&self) -> &'static str {
        "corpus"
    }

    async fn fetch(&self, pattern: &SearchPattern) -> Result<Option<Exercise>> {
        let search_url = self.search_url(&pattern.term)?;
        let mut last_error = String::from("no route attempted");

        for route in self.routes(&search_url) {
            tracing::debug!("📡 corpus: requesting {}", route);

            let response = match self
                .client
                .get(&route)
                .header("Cache-Control", "no-cache")
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    // 逾時直接放棄這個 pattern，不再換路線
                    tracing::warn!("⏱️ corpus: request for '{}' timed out", pattern.term);
                    return Ok(None);
                }
                Err(e) => {
                    tracing::debug!("corpus: route failed: {}", e);
                    last_error = e.to_string();
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::debug!("corpus: route returned {}", response.status());
                last_error = format!("status {}", response.status());
                continue;
            }

            let body: SearchResponse = match response.json().await {
                Ok(body) => body,
                Err(e) if e.is_timeout() => return Ok(None),
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            return self.build_exercise(pattern, body);
        }

        Err(TrainerError::SourceUnavailable {
            source_name: self.name().to_string(),
            message: last_error,
        })
    }
}
