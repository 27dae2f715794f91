use crate::utils::error::{Result, TrainerError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TrainerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Proxy templates wrap the search URL, so they must carry a `{url}` slot
/// and still be a valid URL once it is filled.
pub fn validate_proxy_template(field_name: &str, template: &str) -> Result<()> {
    if !template.contains("{url}") {
        return Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason: "Proxy template must contain a {url} placeholder".to_string(),
        });
    }
    validate_url(field_name, &template.replace("{url}", "x"))
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TrainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("corpus.endpoint", "https://tatoeba.org/eng/api_v0/search").is_ok());
        assert!(validate_url("corpus.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("corpus.endpoint", "").is_err());
        assert!(validate_url("corpus.endpoint", "invalid-url").is_err());
        assert!(validate_url("corpus.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_proxy_template() {
        assert!(validate_proxy_template("corpus.proxies", "https://corsproxy.io/?{url}").is_ok());
        assert!(validate_proxy_template("corpus.proxies", "https://corsproxy.io/?").is_err());
        assert!(validate_proxy_template("corpus.proxies", "{url}").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("practice.round_size", 5, 1).is_ok());
        assert!(validate_positive_number("practice.round_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_and_strings() {
        assert!(validate_range("corpus.timeout_seconds", 6, 1, 120).is_ok());
        assert!(validate_range("corpus.timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_non_empty_string("generative.model", "  ").is_err());
    }
}
