use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No verbs match this specific combination of Tense & Verb.")]
    NoEligiblePatterns,

    #[error("Source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Verb catalog error: {message}")]
    CatalogError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrainerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrainerError::HttpError(_) | TrainerError::SourceUnavailable { .. } => {
                ErrorCategory::Network
            }
            TrainerError::ConfigError { .. }
            | TrainerError::InvalidConfigValueError { .. }
            | TrainerError::MissingConfigError { .. }
            | TrainerError::TomlError(_) => ErrorCategory::Configuration,
            TrainerError::SerializationError(_)
            | TrainerError::NoEligiblePatterns
            | TrainerError::CatalogError { .. } => ErrorCategory::Data,
            TrainerError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路來源失敗時 pipeline 會改用下一個來源
            TrainerError::HttpError(_) | TrainerError::SourceUnavailable { .. } => {
                ErrorSeverity::Medium
            }
            TrainerError::NoEligiblePatterns | TrainerError::SerializationError(_) => {
                ErrorSeverity::High
            }
            TrainerError::ConfigError { .. }
            | TrainerError::InvalidConfigValueError { .. }
            | TrainerError::MissingConfigError { .. }
            | TrainerError::TomlError(_) => ErrorSeverity::High,
            TrainerError::CatalogError { .. } | TrainerError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrainerError::NoEligiblePatterns => self.to_string(),
            TrainerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            TrainerError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            TrainerError::ConfigError { .. } | TrainerError::TomlError(_) => {
                "The configuration file could not be read.".to_string()
            }
            _ => "Could not load exercises. Please try again.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check your connection, or run with --offline to use the built-in sentences"
            }
            ErrorCategory::Configuration => {
                "Check the config file and command-line flags (see --help)"
            }
            ErrorCategory::Data => {
                "Select at least one tense and one verb that belong together (--list-tenses, --list-verbs)"
            }
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_eligible_patterns_message() {
        let err = TrainerError::NoEligiblePatterns;
        assert_eq!(
            err.user_friendly_message(),
            "No verbs match this specific combination of Tense & Verb."
        );
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_source_failures_are_recoverable() {
        let err = TrainerError::SourceUnavailable {
            source_name: "corpus".to_string(),
            message: "all routes failed".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.severity() < ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("--offline"));
    }

    #[test]
    fn test_invalid_value_message_names_field() {
        let err = TrainerError::InvalidConfigValueError {
            field: "practice.round_size".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert!(err.user_friendly_message().contains("practice.round_size"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
