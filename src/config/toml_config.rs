use crate::domain::model::Tense;
use crate::domain::ports::ConfigProvider;
use crate::sources::corpus::DEFAULT_CORPUS_ENDPOINT;
use crate::utils::error::{Result, TrainerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub practice: PracticeConfig,
    pub corpus: CorpusConfig,
    pub generative: GenerativeConfig,
    pub library: LibraryConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Corpus,
    Generative,
    Library,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub round_size: usize,
    pub tenses: Vec<String>,
    pub verbs: Vec<String>,
    /// Remote lookups per round before switching to templates.
    pub max_remote_patterns: usize,
    pub max_batch: usize,
    pub fallback_attempts_per_exercise: usize,
    pub source_order: Vec<SourceKind>,
    pub seed: Option<u64>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            round_size: 5,
            tenses: Vec::new(),
            verbs: Vec::new(),
            max_remote_patterns: 25,
            max_batch: 5,
            fallback_attempts_per_exercise: 10,
            source_order: vec![SourceKind::Corpus, SourceKind::Generative, SourceKind::Library],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub proxies: Vec<String>,
    pub timeout_seconds: u64,
    pub from_language: String,
    pub to_language: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_CORPUS_ENDPOINT.to_string(),
            proxies: Vec::new(),
            timeout_seconds: 6,
            from_language: "eng".to_string(),
            to_language: "spa".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub temperature: f32,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_seconds: 15,
            temperature: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub enabled: bool,
    pub path: Option<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Alternate data files; the embedded ones are used when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub verbs_path: Option<String>,
    pub templates_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrainerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrainerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrainerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_number("practice.round_size", self.practice.round_size, 1)?;
        validation::validate_positive_number("practice.max_batch", self.practice.max_batch, 1)?;
        validation::validate_positive_number(
            "practice.fallback_attempts_per_exercise",
            self.practice.fallback_attempts_per_exercise,
            1,
        )?;

        for tense in &self.practice.tenses {
            if tense.trim().eq_ignore_ascii_case("all") {
                continue;
            }
            tense
                .parse::<Tense>()
                .map_err(|reason| TrainerError::InvalidConfigValueError {
                    field: "practice.tenses".to_string(),
                    value: tense.clone(),
                    reason,
                })?;
        }

        if self.corpus.enabled {
            validation::validate_url("corpus.endpoint", &self.corpus.endpoint)?;
            validation::validate_range("corpus.timeout_seconds", self.corpus.timeout_seconds, 1, 120)?;
            for proxy in &self.corpus.proxies {
                validation::validate_proxy_template("corpus.proxies", proxy)?;
            }
        }

        if self.generative.enabled {
            validation::validate_url("generative.endpoint", &self.generative.endpoint)?;
            validation::validate_non_empty_string("generative.model", &self.generative.model)?;
            validation::validate_range(
                "generative.timeout_seconds",
                self.generative.timeout_seconds,
                1,
                300,
            )?;
            validation::validate_range("generative.temperature", self.generative.temperature, 0.0, 2.0)?;
            if let Some(key) = &self.generative.api_key {
                if key.starts_with("${") {
                    return Err(TrainerError::MissingConfigError {
                        field: format!("generative.api_key (environment variable {} is not set)", key),
                    });
                }
            }
        }

        Ok(())
    }

    /// Remote sources in the order they are tried, skipping disabled ones.
    pub fn enabled_sources(&self) -> Vec<SourceKind> {
        self.practice
            .source_order
            .iter()
            .copied()
            .filter(|kind| match kind {
                SourceKind::Corpus => self.corpus.enabled,
                SourceKind::Generative => self.generative.enabled,
                SourceKind::Library => self.library.enabled,
            })
            .collect()
    }

    /// Turns off every networked source; templates and the library still work.
    pub fn go_offline(&mut self) {
        self.corpus.enabled = false;
        self.generative.enabled = false;
    }
}

impl ConfigProvider for TomlConfig {
    fn round_size(&self) -> usize {
        self.practice.round_size
    }

    fn max_remote_patterns(&self) -> usize {
        self.practice.max_remote_patterns
    }

    fn max_batch(&self) -> usize {
        self.practice.max_batch
    }

    fn fallback_attempts_per_exercise(&self) -> usize {
        self.practice.fallback_attempts_per_exercise
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.corpus.timeout_seconds)
    }

    fn seed(&self) -> Option<u64> {
        self.practice.seed
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
