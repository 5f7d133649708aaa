// Application configuration loaded from the environment
// A .env file is honoured via dotenv before this is read

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Settings for the OpenRouter chat completions endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// `None` when no API key is configured; extraction is then skipped
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let llm = match lookup("OPENROUTER_API_KEY").filter(|key| !key.trim().is_empty()) {
            Some(api_key) => Some(LlmConfig {
                api_key,
                model: lookup("OPENROUTER_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
                base_url: lookup("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
                timeout: Duration::from_secs(parse_or(&lookup, "OPENROUTER_TIMEOUT_SECS", 30)?),
            }),
            None => {
                tracing::info!("OPENROUTER_API_KEY not set, LLM parameter extraction disabled");
                None
            }
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            llm,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => {
            tracing::debug!("{} not set, using default: {}", key, default);
            Ok(default)
        }
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
    fn test_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/cars")]))
                .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.llm.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_database_url() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cars"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn test_llm_settings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cars"),
            ("OPENROUTER_API_KEY", "sk-test"),
            ("OPENROUTER_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        let llm = config.llm.unwrap();
        assert_eq!(llm.api_key, "sk-test");
        assert_eq!(llm.model, DEFAULT_OPENROUTER_MODEL);
        assert_eq!(llm.base_url, DEFAULT_OPENROUTER_BASE_URL);
        assert_eq!(llm.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_disables_llm() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cars"),
            ("OPENROUTER_API_KEY", "  "),
        ]))
        .unwrap();
        assert!(config.llm.is_none());
    }
}
