use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::advisor::extractor::ExtractionMode;

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_base_ms: u64,
    pub kwh_extraction: ExtractionMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            groq_api_key: lookup("GROQ_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("Required environment variable 'GROQ_API_KEY' is not set")?,
            llm_base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 30)?,
            llm_max_retries: parse_or(&lookup, "LLM_MAX_RETRIES", 2)?,
            llm_retry_base_ms: parse_or(&lookup, "LLM_RETRY_BASE_MS", 500)?,
            kwh_extraction: parse_or(&lookup, "KWH_EXTRACTION", ExtractionMode::default())?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("groq_api_key", &"<redacted>")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_retry_base_ms", &self.llm_retry_base_ms)
            .field("kwh_extraction", &self.kwh_extraction)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.groq_api_key, "gsk_test");
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm_timeout_secs, 30);
        assert_eq!(config.llm_max_retries, 2);
        assert_eq!(config.llm_retry_base_ms, 500);
        assert_eq!(config.kwh_extraction, ExtractionMode::Concatenate);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("LLM_BASE_URL", "http://localhost:9999/v1/"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("LLM_MAX_RETRIES", "0"),
            ("KWH_EXTRACTION", "first_match"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.llm_base_url, "http://localhost:9999/v1");
        assert_eq!(config.llm_timeout_secs, 5);
        assert_eq!(config.llm_max_retries, 0);
        assert_eq!(config.kwh_extraction, ExtractionMode::FirstMatch);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_secret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
