pub mod toml_config;

pub use toml_config::{SourceKind, TomlConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "conjugation-trainer")]
#[command(about = "Practice English verb tenses with fill-in-the-blank sentences")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Tenses to practice, comma separated ("past simple,present-perfect" or "all")
    #[arg(long, value_delimiter = ',')]
    pub tenses: Vec<String>,

    /// Verbs to practice, comma separated ("go,to eat" or "all")
    #[arg(long, value_delimiter = ',')]
    pub verbs: Vec<String>,

    #[arg(long)]
    pub round_size: Option<usize>,

    /// Only use the built-in sentences (no network)
    #[arg(long)]
    pub offline: bool,

    /// Ask the generative-text endpoint from the config file for sentences
    #[arg(long)]
    pub generative: bool,

    #[arg(long)]
    pub corpus_endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Print the available tenses and exit
    #[arg(long)]
    pub list_tenses: bool,

    /// Print verbs matching a search term and exit
    #[arg(long)]
    pub list_verbs: Option<String>,

    /// Generate one round, print it as JSON and exit
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (or defaults) and applies command-line overrides.
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if !self.tenses.is_empty() {
            config.practice.tenses = self.tenses.iter().map(|t| t.trim().to_string()).collect();
        }
        if !self.verbs.is_empty() {
            config.practice.verbs = self.verbs.iter().map(|v| v.trim().to_string()).collect();
        }
        if let Some(round_size) = self.round_size {
            config.practice.round_size = round_size;
        }
        if let Some(endpoint) = &self.corpus_endpoint {
            config.corpus.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.corpus.timeout_seconds = timeout;
            config.generative.timeout_seconds = timeout;
        }
        if self.generative {
            config.generative.enabled = true;
        }
        if self.offline {
            tracing::info!("🔌 Offline mode: using built-in sentences only");
            config.go_offline();
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let cli = CliConfig::parse_from([
            "conjugation-trainer",
            "--tenses",
            "past simple,future-simple",
            "--verbs",
            "go, eat",
            "--round-size",
            "3",
            "--timeout-seconds",
            "2",
        ]);
        let mut config = TomlConfig::from_toml_str("[practice]\nround_size = 10\n").unwrap();
        cli.apply_overrides(&mut config);

        assert_eq!(config.practice.round_size, 3);
        assert_eq!(config.practice.tenses, vec!["past simple", "future-simple"]);
        assert_eq!(config.practice.verbs, vec!["go", "eat"]);
        assert_eq!(config.corpus.timeout_seconds, 2);
    }

    #[test]
    fn test_offline_disables_network_sources() {
        let cli = CliConfig::parse_from(["conjugation-trainer", "--offline", "--generative"]);
        let config = cli.load().unwrap();

        assert!(!config.corpus.enabled);
        assert!(!config.generative.enabled);
        assert_eq!(config.enabled_sources(), vec![SourceKind::Library]);
    }
}
